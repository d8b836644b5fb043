// src/store/mod.rs

//! Task record model and the abstract task-store interface.
//!
//! - [`TaskRecord`] / [`TaskStatus`] define the persisted per-task schema.
//! - [`RecordPatch`] is the strongly-typed payload for an atomic merge write.
//! - [`TaskStore`] abstracts the underlying document store; the only
//!   semantics required of it are single reads, batched reads, and an
//!   atomic multi-field merge that stamps a fresh store-side timestamp.
//! - [`memory`] provides an in-memory implementation used by tests and the
//!   demo pipeline.
//! - [`client`] wraps a store with retries, alerting and the batched
//!   output-fetch used by the dependency resolver.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::time::SystemTime;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod memory;

pub use client::StoreClient;
pub use memory::MemoryStore;

/// Canonical task identifier type used throughout the crate.
pub type TaskId = String;

/// Lifecycle state of a task record.
///
/// Transitions only move forward: queued -> processing -> fulfilled or
/// rejected. The engine forces a fresh invocation through queued and
/// processing itself; the dispatcher only ever advances queued to
/// processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Processing,
    Fulfilled,
    Rejected,
}

/// Persisted record for one task execution.
///
/// A record is implicitly created by the first merge write and is never
/// deleted by the engine; it remains as the durable audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub status: TaskStatus,

    /// Result of the task, present only once fulfilled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Declared children, set exactly once on the fulfilled transition when
    /// the declared child list is non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_tasks: Option<Vec<TaskId>>,

    /// Human-readable failure message, present only once rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Store-assigned timestamp, refreshed on every write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<SystemTime>,
}

impl Default for TaskRecord {
    fn default() -> Self {
        Self {
            status: TaskStatus::Queued,
            output: None,
            next_tasks: None,
            error: None,
            updated_at: None,
        }
    }
}

/// Field set for one atomic merge write.
///
/// Only fields set to `Some` are applied; everything else on the record is
/// preserved. The store stamps `updated_at` itself.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub status: Option<TaskStatus>,
    pub output: Option<String>,
    pub next_tasks: Option<Vec<TaskId>>,
    pub error: Option<String>,
}

impl RecordPatch {
    /// Patch that only moves the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Abstract task-record store.
///
/// Production deployments back this with a real document store; tests and
/// the demo pipeline use [`MemoryStore`]. Implementations must guarantee
/// that `merge` applies all fields of a patch (plus the timestamp) together
/// or not at all, so readers never observe a partial transition.
pub trait TaskStore: Send + Sync + Debug {
    /// Read a single record, `None` if it does not exist.
    fn get<'a>(
        &'a self,
        task_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TaskRecord>>> + Send + 'a>>;

    /// Batched read; position `i` of the result corresponds to `task_ids[i]`.
    fn get_many<'a>(
        &'a self,
        task_ids: &'a [TaskId],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Option<TaskRecord>>>> + Send + 'a>>;

    /// Atomic multi-field merge, creating the record if absent and
    /// refreshing its store-side timestamp.
    fn merge<'a>(
        &'a self,
        task_id: &'a str,
        patch: RecordPatch,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
