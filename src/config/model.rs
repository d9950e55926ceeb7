// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::AssetClass;

/// Resolved settings document.
///
/// ```toml
/// port = 8080
/// compatibility = ["last 2 versions"]
///
/// [paths]
/// output    = "dist"
/// templates = ["src/pages/**/*.html"]
/// partials  = ["src/partials/**/*.html", "src/layouts/**/*.html"]
/// styles    = ["src/styles/**/*.scss"]
/// scripts   = ["src/scripts/**/*.js"]
/// assets    = ["src/assets/**/*"]
/// ```
///
/// `port`, `compatibility` and the `[paths]` table are required; a missing
/// field is a fatal startup error.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Network port for the dev server.
    pub port: u16,
    /// Target-platform identifiers, consumed opaquely by the style/script
    /// transforms.
    pub compatibility: Vec<String>,
    pub paths: PathSettings,
}

/// Per-asset-class glob patterns plus the output directory, all relative to
/// the project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSettings {
    pub output: PathBuf,
    pub templates: Vec<String>,
    #[serde(default)]
    pub partials: Vec<String>,
    pub styles: Vec<String>,
    pub scripts: Vec<String>,
    #[serde(default)]
    pub assets: Vec<String>,
}

impl PathSettings {
    /// Watch patterns for the given asset class.
    ///
    /// Partials/layouts belong to the template class: a partial change must
    /// re-render the pages that include it.
    pub fn patterns_for(&self, class: AssetClass) -> Vec<String> {
        match class {
            AssetClass::Static => self.assets.clone(),
            AssetClass::Template => {
                let mut patterns = self.templates.clone();
                patterns.extend(self.partials.iter().cloned());
                patterns
            }
            AssetClass::Style => self.styles.clone(),
            AssetClass::Script => self.scripts.clone(),
        }
    }
}
