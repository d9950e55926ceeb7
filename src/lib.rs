// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod reload;
pub mod transform;
pub mod types;
pub mod watch;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::Settings;
use crate::engine::{Runtime, RuntimeOptions};
use crate::errors::{Result, StagehandError};
use crate::graph::{RunOutcome, Scheduler, TaskGraph};
use crate::reload::ClientRegistry;
use crate::transform::AssetPipeline;
use crate::types::{Mode, TaskName, TriggerReason};
use crate::watch::{debounce, RuleSet};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading
/// - the fixed task graph and scheduler
/// - the asset pipeline
/// - (for serve/watch) the file watcher, debouncer and live reload channel
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let settings = Arc::new(config::load_and_validate(&config_path)?);

    let root = project_root(&config_path);
    let root = root.canonicalize().unwrap_or(root);
    let mode = args.command.mode();

    match args.command {
        Command::Build { .. } => build_once(&root, settings, mode).await,
        Command::Serve { .. } => watch_mode(&root, settings, mode, true).await,
        Command::Watch { .. } => watch_mode(&root, settings, mode, false).await,
    }
}

/// Run the full graph once (cold build) and exit.
async fn build_once(root: &Path, settings: Arc<Settings>, mode: Mode) -> Result<()> {
    let graph = TaskGraph::standard()?;
    let pipeline = Arc::new(AssetPipeline::new(root, settings, None));
    let mut scheduler = Scheduler::new(graph, pipeline);

    let all = full_request(&scheduler);
    let report = scheduler.submit(&all, TriggerReason::ColdStart, mode).await?;

    match report.outcome {
        RunOutcome::Ok => {
            info!("build finished");
            Ok(())
        }
        RunOutcome::Failed(failure) => Err(StagehandError::Transform {
            task: failure.task,
            diagnostic: failure.diagnostic,
        }),
    }
}

/// Cold build, then watch; with `serve` also host the output tree and the
/// live reload channel.
async fn watch_mode(
    root: &Path,
    settings: Arc<Settings>,
    mode: Mode,
    serve: bool,
) -> Result<()> {
    let graph = TaskGraph::standard()?;

    let (reload, reload_port) = if serve {
        let (listener, port) = reload::reserve_ws_port()?;
        let registry = Arc::new(ClientRegistry::new());
        let _acceptor = reload::spawn_ws_acceptor(listener, Arc::clone(&registry));
        (Some(registry), Some(port))
    } else {
        (None, None)
    };

    let pipeline = Arc::new(AssetPipeline::new(root, Arc::clone(&settings), reload_port));
    let output = pipeline.output_dir();
    let mut scheduler = Scheduler::new(graph, pipeline);

    // Cold build. A transform failure is not fatal here; the watch loop will
    // naturally retry on the next relevant change.
    let all = full_request(&scheduler);
    let report = scheduler.submit(&all, TriggerReason::ColdStart, mode).await?;
    match &report.outcome {
        RunOutcome::Ok => info!("cold build finished"),
        RunOutcome::Failed(failure) => warn!(
            task = %failure.task,
            diagnostic = %failure.diagnostic,
            "cold build failed; watching for a fix"
        ),
    }

    if serve {
        reload::spawn_http_server(output.clone(), settings.port);
    }

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let _watcher = watch::spawn_watcher(root.to_path_buf(), events_tx)?;

    // Ctrl-C -> graceful shutdown.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(()).await;
    });

    let rules = RuleSet::from_settings(&settings.paths)?;
    let options = RuntimeOptions {
        root: root.to_path_buf(),
        output,
        mode,
        debounce_window: debounce::DEFAULT_WINDOW,
        reload,
    };

    let runtime = Runtime::new(scheduler, rules, events_rx, shutdown_rx, options);
    runtime.run().await
}

/// The full-graph request used by cold builds.
fn full_request<B: transform::TransformBackend>(scheduler: &Scheduler<B>) -> BTreeSet<TaskName> {
    scheduler
        .graph()
        .task_names()
        .map(str::to_string)
        .collect()
}

/// Figure out a sensible project root from the settings file location.
///
/// - A config path with a non-empty parent (e.g. "site/Stagehand.toml")
///   anchors the project at that directory.
/// - A bare filename falls back to the current working directory.
fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
