// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StagehandError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cycle detected in task graph: {0}")]
    Cycle(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task '{task}' failed: {diagnostic}")]
    Transform { task: String, diagnostic: String },

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StagehandError>;
