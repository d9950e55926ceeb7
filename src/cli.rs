// src/cli.rs

//! Thin command-line surface.
//!
//! All orchestration lives in [`crate::run`]; the CLI only selects the
//! command, the settings file and the build mode.

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::Mode;

#[derive(Parser, Debug)]
#[command(
    name = "stagehand",
    about = "Front-end asset build orchestrator with watch mode and live reload"
)]
pub struct CliArgs {
    /// Path to the settings file.
    #[arg(short, long, default_value = "Stagehand.toml")]
    pub config: String,

    /// Log level (overrides the STAGEHAND_LOG environment variable).
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full task graph once and exit.
    Build {
        /// Emit minified artifacts instead of readable ones.
        #[arg(long)]
        production: bool,
    },
    /// Build once, then serve the output tree with live reload and rebuild on
    /// file changes.
    Serve {
        #[arg(long)]
        production: bool,
    },
    /// Build once and rebuild on file changes, without the dev server.
    Watch {
        #[arg(long)]
        production: bool,
    },
}

impl Command {
    pub fn mode(&self) -> Mode {
        let production = match self {
            Command::Build { production }
            | Command::Serve { production }
            | Command::Watch { production } => *production,
        };
        if production {
            Mode::Production
        } else {
            Mode::Development
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
