// src/engine/dispatch.rs

//! Child trigger dispatch: advance a completed task's declared children
//! from queued to processing.
//!
//! Dispatch is best-effort per child, not all-or-nothing across children: a
//! read or write failure for one child is alerted and contained so the
//! remaining siblings still get their chance.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::alert::Alerter;
use crate::store::{RecordPatch, StoreClient, TaskId, TaskStatus};

#[derive(Debug, Clone)]
pub struct ChildDispatcher {
    client: StoreClient,
    alerter: Arc<dyn Alerter>,
}

impl ChildDispatcher {
    pub fn new(client: StoreClient, alerter: Arc<dyn Alerter>) -> Self {
        Self { client, alerter }
    }

    /// Advance the children declared by `completed_id`.
    ///
    /// Reads the completed task's record; if it is absent or carries no
    /// `next_tasks`, this is a no-op. Each child is advanced atomically,
    /// but only when its current status is exactly queued; any other state
    /// (absent, processing, fulfilled, rejected) is skipped without error,
    /// which makes duplicate dispatch from a second parent an idempotent
    /// skip.
    ///
    /// Returns the children that were actually advanced, in declared order.
    pub async fn dispatch(&self, completed_id: &str) -> Result<Vec<TaskId>> {
        let record = match self.client.get_record(completed_id).await? {
            Some(record) => record,
            None => {
                debug!(task = completed_id, "no record for completed task; nothing to dispatch");
                return Ok(Vec::new());
            }
        };

        let children = match record.next_tasks {
            Some(children) if !children.is_empty() => children,
            _ => {
                debug!(task = completed_id, "completed task declares no children");
                return Ok(Vec::new());
            }
        };

        let mut advanced = Vec::new();

        for child in children {
            match self.try_advance(&child).await {
                Ok(true) => {
                    info!(parent = completed_id, child = %child, "advanced child to processing");
                    advanced.push(child);
                }
                Ok(false) => {
                    debug!(parent = completed_id, child = %child, "child not queued; skipping");
                }
                Err(err) => {
                    self.alerter.alert(
                        &format!("failed to dispatch child task '{child}' of '{completed_id}'"),
                        &format!("{err:#}"),
                    );
                }
            }
        }

        Ok(advanced)
    }

    /// Move one child from queued to processing; `Ok(false)` means the
    /// child was in some other state and was left untouched.
    async fn try_advance(&self, child: &str) -> Result<bool> {
        match self.client.get_record(child).await? {
            Some(record) if record.status == TaskStatus::Queued => {
                self.client
                    .update_atomically(child, RecordPatch::status(TaskStatus::Processing))
                    .await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
