// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::Settings;
use crate::errors::{Result, StagehandError};

/// Load a settings file from a given path without semantic validation.
///
/// This only performs TOML deserialization; use [`load_and_validate`] from
/// application code.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let settings: Settings = toml::from_str(&contents)?;

    Ok(settings)
}

/// Load a settings file and check it for semantic problems:
///
/// - a port of 0 (we need a concrete port to print a usable URL),
/// - an empty output directory,
/// - empty glob lists for the classes every project has (templates, styles,
///   scripts).
///
/// Glob *syntax* is validated later, when the watch rules are compiled.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let settings = load_from_path(&path)?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.port == 0 {
        return Err(StagehandError::Config(
            "`port` must be a concrete port number (got 0)".to_string(),
        ));
    }

    if settings.paths.output.as_os_str().is_empty() {
        return Err(StagehandError::Config(
            "`paths.output` must not be empty".to_string(),
        ));
    }

    for (field, patterns) in [
        ("paths.templates", &settings.paths.templates),
        ("paths.styles", &settings.paths.styles),
        ("paths.scripts", &settings.paths.scripts),
    ] {
        if patterns.is_empty() {
            return Err(StagehandError::Config(format!(
                "`{field}` must contain at least one glob pattern"
            )));
        }
    }

    Ok(())
}
