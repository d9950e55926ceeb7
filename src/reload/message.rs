// src/reload/message.rs

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::AssetClass;

/// What a connected session should do with a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadKind {
    /// Hot-swap the affected style resource without reloading the page.
    /// Style swaps are visually non-disruptive and carry no page state.
    StyleSwap,
    /// Reload the whole page; template or script changes may have altered
    /// running page state in ways that cannot be patched in place.
    FullReload,
}

/// Push message delivered to every connected session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadMessage {
    pub kind: ReloadKind,
    pub paths: Vec<String>,
}

impl ReloadMessage {
    pub fn style_swap(paths: Vec<String>) -> Self {
        Self {
            kind: ReloadKind::StyleSwap,
            paths,
        }
    }

    pub fn full_reload(paths: Vec<String>) -> Self {
        Self {
            kind: ReloadKind::FullReload,
            paths,
        }
    }

    /// The message for a successful re-run of the given classes: a pure
    /// style change hot-swaps, anything else reloads.
    pub fn for_change(classes: &BTreeSet<AssetClass>, paths: Vec<String>) -> Self {
        let style_only =
            !classes.is_empty() && classes.iter().all(|c| *c == AssetClass::Style);
        if style_only {
            Self::style_swap(paths)
        } else {
            Self::full_reload(paths)
        }
    }
}
