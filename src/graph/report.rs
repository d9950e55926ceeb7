// src/graph/report.rs

//! Result types for one execution of the task graph.

use std::collections::BTreeMap;

use crate::graph::task::TaskStatus;
use crate::types::{TaskName, TriggerReason};

/// Identity and diagnostic of the first task that failed in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: TaskName,
    pub diagnostic: String,
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Ok,
    Failed(TaskFailure),
}

/// One execution of a subset of the task graph.
///
/// `statuses` holds the terminal status of every task that participated in
/// the run; tasks satisfied by an earlier run do not appear.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub reason: TriggerReason,
    pub run_id: u64,
    pub statuses: BTreeMap<TaskName, TaskStatus>,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, RunOutcome::Ok)
    }

    pub fn status_of(&self, task: &str) -> Option<TaskStatus> {
        self.statuses.get(task).copied()
    }
}
