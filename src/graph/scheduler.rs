// src/graph/scheduler.rs

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::{Result, StagehandError};
use crate::graph::graph::TaskGraph;
use crate::graph::report::{RunOutcome, RunReport, TaskFailure};
use crate::graph::task::{Concurrency, TaskStatus};
use crate::transform::{ScheduledTask, TransformBackend};
use crate::types::{Mode, TaskName, TriggerReason};

/// Executes subsets of the task graph.
///
/// The scheduler owns the immutable graph plus the cross-run success history.
/// For each submission it:
/// - expands the requested set to the closure of unsatisfied dependencies,
/// - runs `parallel`-class tasks concurrently on a [`JoinSet`],
/// - runs `exclusive`-class tasks alone, as barriers,
/// - fails transitive dependents of a failed task without starting them,
///   while independent branches run to completion.
///
/// Execution of a task is delegated to the [`TransformBackend`]; the
/// scheduler never interprets transform internals, only success or failure.
#[derive(Debug)]
pub struct Scheduler<B> {
    graph: TaskGraph,
    backend: Arc<B>,
    /// Monotonically increasing run ID.
    run_counter: u64,
    /// Last run ID in which each task succeeded. A dependency that has
    /// succeeded in an earlier run is satisfied by history and is not
    /// re-executed; this is what keeps a style-only change from re-running
    /// `clean` and wiping the output tree.
    last_ok_run: HashMap<TaskName, u64>,
}

impl<B: TransformBackend> Scheduler<B> {
    pub fn new(graph: TaskGraph, backend: Arc<B>) -> Self {
        Self {
            graph,
            backend,
            run_counter: 0,
            last_ok_run: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Execute the requested subset of the graph to completion.
    ///
    /// An empty request is a no-op returning immediate success. Unknown task
    /// names are an error before anything executes.
    pub async fn submit(
        &mut self,
        requested: &BTreeSet<TaskName>,
        reason: TriggerReason,
        mode: Mode,
    ) -> Result<RunReport> {
        if requested.is_empty() {
            debug!("empty submission; nothing to run");
            return Ok(RunReport {
                reason,
                run_id: self.run_counter,
                statuses: BTreeMap::new(),
                outcome: RunOutcome::Ok,
            });
        }

        for name in requested {
            if !self.graph.contains(name) {
                return Err(StagehandError::TaskNotFound(name.clone()));
            }
        }

        self.run_counter += 1;
        let run_id = self.run_counter;
        let members = self.closure(requested);

        info!(run_id, ?reason, tasks = ?members, "starting run");

        let mut statuses: BTreeMap<TaskName, TaskStatus> = members
            .iter()
            .cloned()
            .map(|name| (name, TaskStatus::Pending))
            .collect();

        let mut running: JoinSet<(TaskName, anyhow::Result<()>)> = JoinSet::new();
        let mut exclusive_active = false;
        let mut first_failure: Option<TaskFailure> = None;

        loop {
            if !exclusive_active {
                self.dispatch_ready(run_id, mode, &mut statuses, &mut running, &mut exclusive_active);
            }

            if running.is_empty() {
                break;
            }

            let Some(joined) = running.join_next().await else {
                break;
            };
            let (name, result) =
                joined.map_err(|e| anyhow::anyhow!("task execution panicked: {e}"))?;

            if matches!(
                self.graph.get(&name).map(|d| d.concurrency),
                Some(Concurrency::Exclusive)
            ) {
                exclusive_active = false;
            }

            match result {
                Ok(()) => {
                    statuses.insert(name.clone(), TaskStatus::Succeeded);
                    self.last_ok_run.insert(name.clone(), run_id);
                    debug!(task = %name, run_id, "task succeeded");
                }
                Err(err) => {
                    let diagnostic = format!("{err:#}");
                    warn!(task = %name, run_id, %diagnostic, "task failed; failing dependents in this run");
                    statuses.insert(name.clone(), TaskStatus::Failed);
                    if first_failure.is_none() {
                        first_failure = Some(TaskFailure {
                            task: name.clone(),
                            diagnostic,
                        });
                    }
                    for dependent in self.graph.transitive_dependents(&name) {
                        if let Some(status) = statuses.get_mut(&dependent) {
                            if *status == TaskStatus::Pending {
                                *status = TaskStatus::Failed;
                                debug!(
                                    task = %dependent,
                                    "failed without starting due to upstream failure"
                                );
                            }
                        }
                    }
                }
            }
        }

        for (name, status) in statuses.iter_mut() {
            if matches!(status, TaskStatus::Pending | TaskStatus::Running) {
                warn!(task = %name, run_id, "task left non-terminal at end of run; marking failed");
                *status = TaskStatus::Failed;
            }
        }

        let outcome = match first_failure {
            None => RunOutcome::Ok,
            Some(failure) => RunOutcome::Failed(failure),
        };

        info!(run_id, ok = matches!(outcome, RunOutcome::Ok), "run finished");

        Ok(RunReport {
            reason,
            run_id,
            statuses,
            outcome,
        })
    }

    /// Start every task that is ready under the concurrency policy.
    ///
    /// An exclusive task starts only when nothing else is running, and while
    /// one is ready no further parallel tasks are started ahead of it.
    fn dispatch_ready(
        &self,
        run_id: u64,
        mode: Mode,
        statuses: &mut BTreeMap<TaskName, TaskStatus>,
        running: &mut JoinSet<(TaskName, anyhow::Result<()>)>,
        exclusive_active: &mut bool,
    ) {
        let ready = self.ready_tasks(statuses);

        let next_exclusive = ready.iter().find(|name| {
            matches!(
                self.graph.get(name).map(|d| d.concurrency),
                Some(Concurrency::Exclusive)
            )
        });

        if let Some(name) = next_exclusive {
            if running.is_empty() {
                self.spawn_task(name.clone(), run_id, mode, statuses, running);
                *exclusive_active = true;
            }
            // Otherwise hold all dispatches until the running siblings drain.
            return;
        }

        for name in ready {
            self.spawn_task(name, run_id, mode, statuses, running);
        }
    }

    /// Pending tasks whose in-run dependencies have all succeeded.
    /// Dependencies outside the run were satisfied by history when the
    /// closure was computed.
    fn ready_tasks(&self, statuses: &BTreeMap<TaskName, TaskStatus>) -> Vec<TaskName> {
        statuses
            .iter()
            .filter(|(_, status)| **status == TaskStatus::Pending)
            .filter(|(name, _)| {
                self.graph.dependencies_of(name).iter().all(|dep| {
                    match statuses.get(dep) {
                        Some(status) => *status == TaskStatus::Succeeded,
                        None => true,
                    }
                })
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn spawn_task(
        &self,
        name: TaskName,
        run_id: u64,
        mode: Mode,
        statuses: &mut BTreeMap<TaskName, TaskStatus>,
        running: &mut JoinSet<(TaskName, anyhow::Result<()>)>,
    ) {
        let Some(def) = self.graph.get(&name) else {
            warn!(task = %name, "ready task missing from graph; skipping");
            return;
        };

        debug!(task = %name, run_id, action = ?def.action, "dependencies satisfied; dispatching");
        statuses.insert(name.clone(), TaskStatus::Running);

        let task = ScheduledTask {
            name: name.clone(),
            action: def.action,
            mode,
            run_id,
        };
        let backend = Arc::clone(&self.backend);

        running.spawn(async move {
            let result = backend.run_task(task).await;
            (name, result)
        });
    }

    /// Expand the requested set with every dependency that is not yet
    /// satisfied by an earlier successful run.
    fn closure(&self, requested: &BTreeSet<TaskName>) -> BTreeSet<TaskName> {
        let mut members = BTreeSet::new();
        let mut stack: Vec<TaskName> = requested.iter().cloned().collect();

        while let Some(name) = stack.pop() {
            if !members.insert(name.clone()) {
                continue;
            }
            for dep in self.graph.dependencies_of(&name) {
                if self.last_ok_run.contains_key(dep) {
                    continue;
                }
                stack.push(dep.clone());
            }
        }

        members
    }
}
