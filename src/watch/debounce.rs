// src/watch/debounce.rs

//! Coalescing of rapid-fire change events.
//!
//! Editor save bursts produce several events for the same sources within
//! milliseconds. Events sharing the same task-target union are merged into
//! one pending run whose deadline resets on every new event; the run fires
//! once the window elapses quietly. The window length is a tunable constant,
//! not a precise requirement.
//!
//! This type is pure state plus deadlines; the async loop around it lives in
//! the engine runtime, which keeps the coalescing logic trivially testable.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::{AssetClass, TaskName};
use crate::watch::rules::RuleMatch;

/// Default coalescing window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(100);

/// One coalesced submission waiting for its window to elapse.
#[derive(Debug, Clone)]
pub struct PendingRun {
    pub tasks: BTreeSet<TaskName>,
    pub classes: BTreeSet<AssetClass>,
    pub paths: BTreeSet<String>,
    pub deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Vec<PendingRun>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Fold a qualifying event into the pending run with the same task-target
    /// union, resetting its deadline; distinct unions stay separate.
    pub fn record(&mut self, matched: RuleMatch, rel_path: String, now: Instant) {
        if matched.is_empty() {
            return;
        }

        let deadline = now + self.window;

        if let Some(entry) = self.pending.iter_mut().find(|p| p.tasks == matched.tasks) {
            entry.classes.extend(matched.classes);
            entry.paths.insert(rel_path);
            entry.deadline = deadline;
            return;
        }

        let mut paths = BTreeSet::new();
        paths.insert(rel_path);
        self.pending.push(PendingRun {
            tasks: matched.tasks,
            classes: matched.classes,
            paths,
            deadline,
        });
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Remove and return every pending run whose window has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingRun> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].deadline <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
