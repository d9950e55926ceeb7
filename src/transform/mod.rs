// src/transform/mod.rs

//! Artifact transform layer.
//!
//! The scheduler talks to a [`TransformBackend`] instead of concrete file
//! operations. This keeps the orchestration core testable (tests plug in a
//! fake backend) while production uses [`AssetPipeline`], which performs the
//! actual file work.
//!
//! A transform is an internally ordered sequence of sub-steps any of which
//! can fail and short-circuit; only the aggregate success or failure is
//! visible to the scheduler.

pub mod pipeline;

use std::future::Future;
use std::pin::Pin;

use crate::graph::task::TaskAction;
use crate::types::{AssetClass, Mode, TaskName};

pub use pipeline::AssetPipeline;

/// Description of a task the scheduler wants executed now.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub name: TaskName,
    pub action: TaskAction,
    pub mode: Mode,
    /// Monotonically increasing run identifier; all tasks of the same run
    /// share it.
    pub run_id: u64,
}

/// Trait abstracting how scheduled tasks are executed.
///
/// Production code uses [`AssetPipeline`]; tests can provide an
/// implementation that records dispatches and fails on demand.
pub trait TransformBackend: Send + Sync + 'static {
    /// Execute one task to completion. An `Err` is the task's diagnostic;
    /// the scheduler attaches the task identity.
    fn run_task(
        &self,
        task: ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

    /// Remove any previously generated artifact for the given class ahead of
    /// a re-run, so a renamed source cannot leave stale output behind.
    ///
    /// Backends without on-disk artifacts keep the default no-op.
    fn discard_artifacts(
        &self,
        _class: AssetClass,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> {
        Box::pin(async { Ok(()) })
    }
}
