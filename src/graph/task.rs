// src/graph/task.rs

//! Task definitions and per-run status.

use crate::types::{AssetClass, TaskName};

/// Well-known task names of the fixed build graph.
pub const CLEAN: &str = "clean";
pub const COPY: &str = "copy";
pub const TEMPLATE: &str = "template";
pub const STYLE: &str = "style";
pub const SCRIPT: &str = "script";

/// Whether a task may run alongside its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    /// Must run with no sibling concurrently active (a barrier).
    Exclusive,
    /// May run alongside other parallel siblings once its dependencies are
    /// satisfied.
    Parallel,
}

/// The executable unit behind a task.
///
/// The scheduler never interprets the unit; it only delegates to the
/// transform backend and observes success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Delete and recreate the output tree.
    CleanOutput,
    /// Run the artifact transform for one asset class.
    Transform(AssetClass),
}

/// Immutable task definition. Only per-run status (held by the scheduler)
/// is mutable.
#[derive(Debug, Clone)]
pub struct TaskDef {
    pub name: TaskName,
    pub deps: Vec<TaskName>,
    pub concurrency: Concurrency,
    pub action: TaskAction,
}

impl TaskDef {
    pub fn new(
        name: impl Into<TaskName>,
        deps: Vec<TaskName>,
        concurrency: Concurrency,
        action: TaskAction,
    ) -> Self {
        Self {
            name: name.into(),
            deps,
            concurrency,
            action,
        }
    }

    /// The fixed build graph: `clean` is an exclusive barrier, the four
    /// transform tasks depend on it and run in parallel.
    pub fn standard_set() -> Vec<TaskDef> {
        let after_clean = vec![CLEAN.to_string()];
        vec![
            TaskDef::new(CLEAN, Vec::new(), Concurrency::Exclusive, TaskAction::CleanOutput),
            TaskDef::new(
                COPY,
                after_clean.clone(),
                Concurrency::Parallel,
                TaskAction::Transform(AssetClass::Static),
            ),
            TaskDef::new(
                TEMPLATE,
                after_clean.clone(),
                Concurrency::Parallel,
                TaskAction::Transform(AssetClass::Template),
            ),
            TaskDef::new(
                STYLE,
                after_clean.clone(),
                Concurrency::Parallel,
                TaskAction::Transform(AssetClass::Style),
            ),
            TaskDef::new(
                SCRIPT,
                after_clean,
                Concurrency::Parallel,
                TaskAction::Transform(AssetClass::Script),
            ),
        ]
    }
}

/// Terminal status of a task within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}
