// src/graph/mod.rs

//! Task graph and scheduling.
//!
//! - [`task`] defines immutable task definitions, concurrency classes and
//!   per-run status.
//! - [`graph`] holds the directed acyclic graph of tasks and rejects cycles
//!   at construction, before anything executes.
//! - [`scheduler`] executes a requested subset of the graph to completion or
//!   first failure, delegating the actual work to a transform backend.
//! - [`report`] is the result type of one run.

pub mod graph;
pub mod report;
pub mod scheduler;
pub mod task;

pub use graph::TaskGraph;
pub use report::{RunOutcome, RunReport, TaskFailure};
pub use scheduler::Scheduler;
pub use task::{Concurrency, TaskAction, TaskDef, TaskStatus};
