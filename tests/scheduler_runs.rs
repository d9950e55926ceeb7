// tests/scheduler_runs.rs

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::fake::FakeBackend;
use common::{exclusive_task, init_tracing, task};

use stagehand::errors::StagehandError;
use stagehand::graph::{RunOutcome, Scheduler, TaskGraph, TaskStatus};
use stagehand::types::{Mode, TriggerReason};

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn cold_build_runs_clean_first_then_the_parallel_siblings() {
    init_tracing();

    let graph = TaskGraph::standard().unwrap();
    let backend = Arc::new(FakeBackend::new());
    let mut scheduler = Scheduler::new(graph, Arc::clone(&backend));

    let all = names(&["clean", "copy", "template", "style", "script"]);
    let report = scheduler
        .submit(&all, TriggerReason::ColdStart, Mode::Development)
        .await
        .unwrap();

    assert!(report.is_ok());

    let executed = backend.executed();
    assert_eq!(executed.len(), 5, "every task runs exactly once");
    assert_eq!(executed[0], "clean", "the barrier completes alone first");

    let executed_set: BTreeSet<String> = executed.into_iter().collect();
    assert_eq!(executed_set, all);

    for task_name in &all {
        assert_eq!(report.status_of(task_name), Some(TaskStatus::Succeeded));
    }
}

#[tokio::test]
async fn empty_submission_is_a_noop() {
    init_tracing();

    let graph = TaskGraph::standard().unwrap();
    let backend = Arc::new(FakeBackend::new());
    let mut scheduler = Scheduler::new(graph, Arc::clone(&backend));

    let report = scheduler
        .submit(&BTreeSet::new(), TriggerReason::FileChange, Mode::Development)
        .await
        .unwrap();

    assert!(report.is_ok());
    assert!(report.statuses.is_empty());
    assert!(backend.executed().is_empty());
}

#[tokio::test]
async fn unknown_task_is_rejected_before_anything_runs() {
    init_tracing();

    let graph = TaskGraph::standard().unwrap();
    let backend = Arc::new(FakeBackend::new());
    let mut scheduler = Scheduler::new(graph, Arc::clone(&backend));

    let err = scheduler
        .submit(&names(&["lint"]), TriggerReason::FileChange, Mode::Development)
        .await
        .unwrap_err();

    assert!(matches!(err, StagehandError::TaskNotFound(name) if name == "lint"));
    assert!(backend.executed().is_empty());
}

#[tokio::test]
async fn failure_blocks_transitive_dependents_but_not_independent_branches() {
    init_tracing();

    // a -> b -> c, with d on its own branch.
    let graph = TaskGraph::new(vec![
        task("a", &[]),
        task("b", &["a"]),
        task("c", &["b"]),
        task("d", &[]),
    ])
    .unwrap();

    let backend = Arc::new(FakeBackend::new());
    backend.fail_task("a");
    let mut scheduler = Scheduler::new(graph, Arc::clone(&backend));

    let report = scheduler
        .submit(&names(&["a", "b", "c", "d"]), TriggerReason::ColdStart, Mode::Development)
        .await
        .unwrap();

    let executed: BTreeSet<String> = backend.executed().into_iter().collect();
    assert_eq!(executed, names(&["a", "d"]), "b and c are never invoked");

    assert_eq!(report.status_of("a"), Some(TaskStatus::Failed));
    assert_eq!(report.status_of("b"), Some(TaskStatus::Failed));
    assert_eq!(report.status_of("c"), Some(TaskStatus::Failed));
    assert_eq!(report.status_of("d"), Some(TaskStatus::Succeeded));

    match report.outcome {
        RunOutcome::Failed(failure) => {
            assert_eq!(failure.task, "a");
            assert!(failure.diagnostic.contains("synthetic failure"));
        }
        RunOutcome::Ok => panic!("run must report the failure"),
    }
}

#[tokio::test]
async fn style_only_change_reruns_only_the_style_task() {
    init_tracing();

    let graph = TaskGraph::standard().unwrap();
    let backend = Arc::new(FakeBackend::new());
    let mut scheduler = Scheduler::new(graph, Arc::clone(&backend));

    let all = names(&["clean", "copy", "template", "style", "script"]);
    scheduler
        .submit(&all, TriggerReason::ColdStart, Mode::Development)
        .await
        .unwrap();
    backend.clear_executed();

    let report = scheduler
        .submit(&names(&["style"]), TriggerReason::FileChange, Mode::Development)
        .await
        .unwrap();

    assert!(report.is_ok());
    assert_eq!(backend.executed(), vec!["style".to_string()]);
    assert_eq!(report.statuses.len(), 1, "clean is satisfied by history");
}

#[tokio::test]
async fn failed_dependency_is_retried_together_with_its_dependent() {
    init_tracing();

    let graph = TaskGraph::standard().unwrap();
    let backend = Arc::new(FakeBackend::new());
    backend.fail_task("clean");
    let mut scheduler = Scheduler::new(graph, Arc::clone(&backend));

    let all = names(&["clean", "copy", "template", "style", "script"]);
    let report = scheduler
        .submit(&all, TriggerReason::ColdStart, Mode::Development)
        .await
        .unwrap();
    assert!(!report.is_ok());
    assert_eq!(backend.executed(), vec!["clean".to_string()]);

    // The operator fixes the problem; the next partial run pulls the
    // never-succeeded dependency back in.
    backend.clear_failures();
    backend.clear_executed();

    let report = scheduler
        .submit(&names(&["style"]), TriggerReason::FileChange, Mode::Development)
        .await
        .unwrap();

    assert!(report.is_ok());
    assert_eq!(backend.executed(), vec!["clean".to_string(), "style".to_string()]);
}

#[tokio::test]
async fn exclusive_tasks_never_overlap_anything() {
    init_tracing();

    let graph = TaskGraph::new(vec![
        exclusive_task("e1", &[]),
        exclusive_task("e2", &[]),
        task("p", &[]),
    ])
    .unwrap();

    let backend = Arc::new(FakeBackend::new());
    let mut scheduler = Scheduler::new(graph, Arc::clone(&backend));

    let report = scheduler
        .submit(&names(&["e1", "e2", "p"]), TriggerReason::ColdStart, Mode::Development)
        .await
        .unwrap();

    assert!(report.is_ok());
    // Barriers drain the run queue one at a time, ahead of parallel work.
    assert_eq!(
        backend.executed(),
        vec!["e1".to_string(), "e2".to_string(), "p".to_string()]
    );
}
