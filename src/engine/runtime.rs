// src/engine/runtime.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::graph::{RunOutcome, Scheduler};
use crate::reload::{ClientRegistry, ReloadMessage};
use crate::transform::TransformBackend;
use crate::types::{AssetClass, Mode, TriggerReason};
use crate::watch::{relative_str, ChangeEvent, Debouncer, PendingRun, RuleSet};

/// Static wiring for the watch loop.
#[derive(Debug)]
pub struct RuntimeOptions {
    /// Project root all watch patterns are relative to.
    pub root: PathBuf,
    /// Absolute output directory; events under it are never invalidating.
    pub output: PathBuf,
    pub mode: Mode,
    pub debounce_window: Duration,
    /// Live reload registry, when serving.
    pub reload: Option<Arc<ClientRegistry>>,
}

/// The watch-mode event loop.
pub struct Runtime<B: TransformBackend> {
    scheduler: Scheduler<B>,
    rules: RuleSet,
    debouncer: Debouncer,
    events_rx: mpsc::UnboundedReceiver<ChangeEvent>,
    shutdown_rx: mpsc::Receiver<()>,
    options: RuntimeOptions,
}

impl<B: TransformBackend> Runtime<B> {
    pub fn new(
        scheduler: Scheduler<B>,
        rules: RuleSet,
        events_rx: mpsc::UnboundedReceiver<ChangeEvent>,
        shutdown_rx: mpsc::Receiver<()>,
        options: RuntimeOptions,
    ) -> Self {
        let debouncer = Debouncer::new(options.debounce_window);
        Self {
            scheduler,
            rules,
            debouncer,
            events_rx,
            shutdown_rx,
            options,
        }
    }

    /// Main loop; returns when shutdown is requested or the event source
    /// closes.
    pub async fn run(mut self) -> Result<()> {
        info!("watch loop started");

        loop {
            let deadline = self.debouncer.next_deadline();
            // Placeholder target for the disabled timer branch.
            let target = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                maybe_event = self.events_rx.recv() => {
                    match maybe_event {
                        Some(event) => self.handle_event(event),
                        None => {
                            info!("change event channel closed; stopping watch loop");
                            break;
                        }
                    }
                }
                _ = sleep_until(target), if deadline.is_some() => {
                    self.flush_due().await?;
                }
                _ = self.shutdown_rx.recv() => {
                    info!("shutdown requested; stopping watch loop");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Map one change event through the watch rules into the debouncer.
    fn handle_event(&mut self, event: ChangeEvent) {
        if event.path.starts_with(&self.options.output) {
            return;
        }

        let Some(rel) = relative_str(&self.options.root, &event.path) else {
            debug!(path = %event.path.display(), "event outside project root; ignoring");
            return;
        };

        let matched = self.rules.match_path(&rel);
        if matched.is_empty() {
            debug!(path = %rel, "no watch rule matches; ignoring");
            return;
        }

        debug!(path = %rel, kind = ?event.kind, tasks = ?matched.tasks, "change matched watch rules");
        self.debouncer.record(matched, rel, Instant::now());
    }

    async fn flush_due(&mut self) -> Result<()> {
        let now = Instant::now();
        for pending in self.debouncer.take_due(now) {
            self.execute_pending(pending).await?;
        }
        Ok(())
    }

    /// Run one coalesced submission and notify connected sessions.
    async fn execute_pending(&mut self, pending: PendingRun) -> Result<()> {
        // Style and script outputs are whole-artifact regenerations; remove
        // the previous artifact so a renamed source cannot leave stale
        // output behind.
        for class in [AssetClass::Style, AssetClass::Script] {
            if pending.classes.contains(&class) {
                if let Err(e) = self.scheduler.backend().discard_artifacts(class).await {
                    warn!(%class, "failed to discard stale artifacts: {e:#}");
                }
            }
        }

        let report = self
            .scheduler
            .submit(&pending.tasks, TriggerReason::FileChange, self.options.mode)
            .await?;

        match &report.outcome {
            RunOutcome::Ok => {
                if let Some(reload) = &self.options.reload {
                    let paths: Vec<String> = pending.paths.iter().cloned().collect();
                    reload.notify(&ReloadMessage::for_change(&pending.classes, paths));
                }
            }
            RunOutcome::Failed(failure) => {
                // No automatic retry; the next correcting file change is the
                // idiomatic fix path.
                warn!(
                    task = %failure.task,
                    diagnostic = %failure.diagnostic,
                    "rebuild failed; watching for the next change"
                );
            }
        }

        Ok(())
    }
}
