// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::info;

use crate::errors::Result;

/// A filesystem change observed by the watcher.
///
/// Carries no timestamp: the debounce window opens when the runtime picks
/// the event up, so changes arriving while a run is active get a full
/// window afterwards instead of firing immediately with a stale deadline.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// Handle keeping the underlying `notify` watcher alive. Dropping it stops
/// file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and forward qualifying events into `events_tx`.
///
/// Only create/modify/remove events qualify; access and metadata-only events
/// are dropped at the source. A failure to establish the subscription is
/// fatal to watch mode (the caller decides what that means for the process).
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    events_tx: mpsc::UnboundedSender<ChangeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so event paths relativize against a stable base.
    let root = root.canonicalize().unwrap_or(root);

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let Some(kind) = change_kind(&event.kind) else {
                    return;
                };
                for path in event.paths {
                    let change = ChangeEvent { path, kind };
                    if events_tx.send(change).is_err() {
                        // Runtime gone; nothing useful left to do here.
                        return;
                    }
                }
            }
            Err(err) => {
                eprintln!("stagehand: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(root = %root.display(), "file watcher started");

    Ok(WatcherHandle { _inner: watcher })
}

fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        _ => None,
    }
}
