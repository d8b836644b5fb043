// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskrelay`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskrelay",
    version,
    about = "Run a DAG of interdependent tasks against an in-memory task store.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the pipeline topology file (TOML).
    ///
    /// Default: `Taskrelay.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Taskrelay.toml")]
    pub config: String,

    /// Parse + validate, print the topology, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKRELAY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
