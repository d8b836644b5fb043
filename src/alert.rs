// src/alert.rs

//! Developer-alert capability.
//!
//! Alerts are one-way notifications to whatever alerting collaborator is
//! plugged in (chat webhook, paging system, plain logs). They are
//! fire-and-forget: never retried, never awaited, and never allowed to
//! affect engine control flow.

use std::fmt::Debug;

use tracing::error;

/// One-way notifier for conditions a developer should look at.
pub trait Alerter: Send + Sync + Debug {
    /// Emit a single alert. Implementations must not block or fail.
    fn alert(&self, message: &str, detail: &str);
}

/// Default alerter that reports through the `tracing` error level.
#[derive(Debug, Clone, Default)]
pub struct LogAlerter;

impl Alerter for LogAlerter {
    fn alert(&self, message: &str, detail: &str) {
        error!(target: "taskrelay::alert", detail, "{message}");
    }
}
