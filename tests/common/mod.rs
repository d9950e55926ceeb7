#![allow(dead_code)]

pub mod fake;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

use stagehand::config::{PathSettings, Settings};
use stagehand::graph::{Concurrency, TaskAction, TaskDef};
use stagehand::types::AssetClass;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// A parallel task with the given dependencies. The action is irrelevant to
/// the fake backend.
pub fn task(name: &str, deps: &[&str]) -> TaskDef {
    TaskDef::new(
        name,
        deps.iter().map(|d| d.to_string()).collect(),
        Concurrency::Parallel,
        TaskAction::Transform(AssetClass::Static),
    )
}

/// An exclusive (barrier) task with the given dependencies.
pub fn exclusive_task(name: &str, deps: &[&str]) -> TaskDef {
    TaskDef::new(
        name,
        deps.iter().map(|d| d.to_string()).collect(),
        Concurrency::Exclusive,
        TaskAction::CleanOutput,
    )
}

/// Settings matching the layout used throughout the tests.
pub fn test_settings() -> Settings {
    Settings {
        port: 8080,
        compatibility: vec!["last 2 versions".to_string()],
        paths: PathSettings {
            output: "dist".into(),
            templates: vec!["src/pages/**/*.html".to_string()],
            partials: vec![
                "src/partials/**/*.html".to_string(),
                "src/layouts/**/*.html".to_string(),
            ],
            styles: vec!["src/styles/**/*.scss".to_string()],
            scripts: vec!["src/scripts/**/*.js".to_string()],
            assets: vec!["src/assets/**/*".to_string()],
        },
    }
}
