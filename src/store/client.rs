// src/store/client.rs

//! Store client: the engine's only gateway to the task store.
//!
//! All state transitions go through here so that every write is an atomic
//! multi-field merge and every status write is retried with backoff before
//! giving up. Reads degrade gracefully: a missing parent record contributes
//! an empty output instead of failing the caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::alert::Alerter;
use crate::errors::TaskRelayError;
use crate::retry::retry;

use super::{RecordPatch, TaskId, TaskRecord, TaskStatus, TaskStore};

/// Default retry policy for status writes.
const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Retrying, alerting wrapper around a [`TaskStore`].
#[derive(Debug, Clone)]
pub struct StoreClient {
    store: Arc<dyn TaskStore>,
    alerter: Arc<dyn Alerter>,
    attempts: u32,
    base_delay: Duration,
}

impl StoreClient {
    pub fn new(store: Arc<dyn TaskStore>, alerter: Arc<dyn Alerter>) -> Self {
        Self {
            store,
            alerter,
            attempts: DEFAULT_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Override the retry policy. Tests use short delays; production keeps
    /// the defaults (3 attempts, 1000 ms base).
    pub fn with_retry_policy(mut self, attempts: u32, base_delay: Duration) -> Self {
        self.attempts = attempts;
        self.base_delay = base_delay;
        self
    }

    /// Retried status write: merges `status`, the extra fields and a fresh
    /// store timestamp into the record, preserving everything unspecified.
    ///
    /// On retry exhaustion this emits a developer alert and returns
    /// [`TaskRelayError::StoreWrite`]; the record stays in its last
    /// successfully-written state.
    pub async fn set_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        extra: RecordPatch,
    ) -> crate::errors::Result<()> {
        let patch = RecordPatch {
            status: Some(status),
            ..extra
        };

        debug!(task = task_id, ?status, "writing status transition");

        let result = retry(
            || self.store.merge(task_id, patch.clone()),
            self.attempts,
            self.base_delay,
        )
        .await;

        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                self.alerter.alert(
                    &format!("store write for task '{task_id}' exhausted its retries"),
                    &format!("{err:#}"),
                );
                Err(TaskRelayError::StoreWrite {
                    task: task_id.to_string(),
                    attempts: self.attempts,
                    source: err,
                })
            }
        }
    }

    /// Single un-retried atomic merge: all fields plus the timestamp land
    /// together or not at all.
    pub async fn update_atomically(&self, task_id: &str, patch: RecordPatch) -> Result<()> {
        self.store.merge(task_id, patch).await
    }

    /// One batched read across all given parents. Position `i` of the
    /// result corresponds to `parent_ids[i]`; an absent record or absent
    /// output field degrades to an empty string rather than an error.
    pub async fn get_outputs(&self, parent_ids: &[TaskId]) -> Result<Vec<String>> {
        let records = self.store.get_many(parent_ids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                record
                    .and_then(|r| r.output)
                    .unwrap_or_default()
            })
            .collect())
    }

    /// Single record read.
    pub async fn get_record(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        self.store.get(task_id).await
    }
}
