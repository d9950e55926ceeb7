// src/watch/rules.rs

use std::collections::BTreeSet;
use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::PathSettings;
use crate::errors::{Result, StagehandError};
use crate::graph::task;
use crate::types::{AssetClass, TaskName};

/// Compiled glob patterns of one asset class, bound to its task.
///
/// Built once from settings and never mutated at runtime. Patterns are
/// matched against paths relative to the project root, e.g.
/// `"src/styles/app.scss"`.
#[derive(Clone)]
pub struct WatchRule {
    class: AssetClass,
    task: TaskName,
    globs: GlobSet,
}

impl fmt::Debug for WatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRule")
            .field("class", &self.class)
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}

impl WatchRule {
    pub fn class(&self) -> AssetClass {
        self.class
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.globs.is_match(rel_path)
    }
}

/// Tasks and asset classes owning a changed path.
///
/// A path may satisfy multiple rules; the union of their targets is used.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub tasks: BTreeSet<TaskName>,
    pub classes: BTreeSet<AssetClass>,
}

impl RuleMatch {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// The full watch rule table, one rule per asset class with patterns.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<WatchRule>,
}

impl RuleSet {
    pub fn from_settings(paths: &PathSettings) -> Result<Self> {
        let bindings = [
            (AssetClass::Static, task::COPY),
            (AssetClass::Template, task::TEMPLATE),
            (AssetClass::Style, task::STYLE),
            (AssetClass::Script, task::SCRIPT),
        ];

        let mut rules = Vec::new();
        for (class, task_name) in bindings {
            let patterns = paths.patterns_for(class);
            if patterns.is_empty() {
                continue;
            }
            rules.push(WatchRule {
                class,
                task: task_name.to_string(),
                globs: build_globset(class, &patterns)?,
            });
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[WatchRule] {
        &self.rules
    }

    /// Union of the targets of every rule matching `rel_path`.
    pub fn match_path(&self, rel_path: &str) -> RuleMatch {
        let mut matched = RuleMatch::default();
        for rule in &self.rules {
            if rule.matches(rel_path) {
                matched.tasks.insert(rule.task.clone());
                matched.classes.insert(rule.class);
            }
        }
        matched
    }
}

fn build_globset(class: AssetClass, patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            StagehandError::Config(format!(
                "invalid glob pattern '{pattern}' for {class} paths: {e}"
            ))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| StagehandError::Config(format!("building {class} globset: {e}")))
}
