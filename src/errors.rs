// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskRelayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A status write was retried to exhaustion and gave up.
    ///
    /// The record is left in its last successfully-written state, which may
    /// be stale relative to the intended transition.
    #[error("store write for task '{task}' failed after {attempts} attempts")]
    StoreWrite {
        task: String,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// Caller-supplied task logic (or the dependency fetch feeding it)
    /// failed; the record has been transitioned to `rejected`.
    #[error("task '{task}' failed")]
    TaskFailed {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskRelayError>;
