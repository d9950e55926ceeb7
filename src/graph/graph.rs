// src/graph/graph.rs

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{Result, StagehandError};
use crate::graph::task::TaskDef;
use crate::types::TaskName;

/// Directed acyclic graph of task definitions.
///
/// Construction validates the whole graph up front: duplicate names, unknown
/// or self dependencies and cycles are configuration errors surfaced before
/// any task runs.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: BTreeMap<TaskName, TaskDef>,
    dependents: HashMap<TaskName, Vec<TaskName>>,
}

impl TaskGraph {
    pub fn new(defs: Vec<TaskDef>) -> Result<Self> {
        let mut tasks: BTreeMap<TaskName, TaskDef> = BTreeMap::new();

        for def in defs {
            if tasks.insert(def.name.clone(), def.clone()).is_some() {
                return Err(StagehandError::Config(format!(
                    "duplicate task name '{}'",
                    def.name
                )));
            }
        }

        for def in tasks.values() {
            for dep in &def.deps {
                if dep == &def.name {
                    return Err(StagehandError::Config(format!(
                        "task '{}' cannot depend on itself",
                        def.name
                    )));
                }
                if !tasks.contains_key(dep) {
                    return Err(StagehandError::Config(format!(
                        "task '{}' has unknown dependency '{}'",
                        def.name, dep
                    )));
                }
            }
        }

        check_acyclic(&tasks)?;

        let mut dependents: HashMap<TaskName, Vec<TaskName>> = HashMap::new();
        for def in tasks.values() {
            for dep in &def.deps {
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(def.name.clone());
            }
        }

        Ok(Self { tasks, dependents })
    }

    /// The fixed build graph used by cold builds. Statically acyclic, but we
    /// still run it through the same validation as any other graph.
    pub fn standard() -> Result<Self> {
        Self::new(TaskDef::standard_set())
    }

    pub fn get(&self, name: &str) -> Option<&TaskDef> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Direct dependencies of `name` (empty for unknown tasks).
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.tasks.get(name).map(|d| d.deps.as_slice()).unwrap_or(&[])
    }

    /// Direct dependents of `name` (empty for unknown tasks).
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.dependents.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All tasks that transitively depend on `name`, excluding `name` itself.
    pub fn transitive_dependents(&self, name: &str) -> BTreeSet<TaskName> {
        let mut out = BTreeSet::new();
        let mut stack: Vec<TaskName> = self.dependents_of(name).to_vec();

        while let Some(current) = stack.pop() {
            if out.insert(current.clone()) {
                stack.extend(self.dependents_of(&current).iter().cloned());
            }
        }

        out
    }
}

/// A topological sort fails exactly when the dependency edges contain a
/// cycle.
fn check_acyclic(tasks: &BTreeMap<TaskName, TaskDef>) -> Result<()> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in tasks.keys() {
        graph.add_node(name.as_str());
    }

    for def in tasks.values() {
        for dep in &def.deps {
            graph.add_edge(dep.as_str(), def.name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(StagehandError::Cycle(format!(
            "dependency cycle involving task '{}'",
            cycle.node_id()
        ))),
    }
}
