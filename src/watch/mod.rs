// src/watch/mod.rs

//! File watching and invalidation.
//!
//! This module turns filesystem changes into task-level work:
//! - [`rules`] compiles per-asset-class glob patterns into watch rules and
//!   maps changed paths to the owning tasks.
//! - [`debounce`] coalesces rapid-fire events for the same task-target union
//!   into a single submission.
//! - [`watcher`] wires up the cross-platform `notify` watcher and bridges
//!   its callback into an async channel of [`ChangeEvent`]s.
//!
//! It does not know about dependency edges; resolving the full run is the
//! scheduler's job.

pub mod debounce;
pub mod rules;
pub mod watcher;

use std::path::Path;

pub use debounce::{Debouncer, PendingRun, DEFAULT_WINDOW};
pub use rules::{RuleMatch, RuleSet, WatchRule};
pub use watcher::{spawn_watcher, ChangeEvent, ChangeKind, WatcherHandle};

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Falls back to canonicalizing both sides, which helps on platforms where
/// watch events carry a different absolute prefix for the same directory.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(rel.to_string_lossy().replace('\\', "/"));
        }
    }

    None
}
