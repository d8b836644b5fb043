// src/store/memory.rs

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use anyhow::Result;

use super::{RecordPatch, TaskId, TaskRecord, TaskStore};

/// In-memory [`TaskStore`] used by tests and the demo pipeline.
///
/// Cloning is cheap and shares the underlying record map, so a test can
/// keep a handle and inspect records after the engine has run. The mutex is
/// held only for the duration of one map operation, which makes each
/// `merge` atomic from the point of view of concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<TaskId, TaskRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a record, e.g. a child seeded as queued.
    pub fn insert(&self, task_id: impl Into<TaskId>, record: TaskRecord) {
        let mut records = self.records.lock().unwrap();
        records.insert(task_id.into(), record);
    }

    /// Direct synchronous read for assertions in tests and CLI summaries.
    pub fn record(&self, task_id: &str) -> Option<TaskRecord> {
        let records = self.records.lock().unwrap();
        records.get(task_id).cloned()
    }

    /// Copy of the whole record map.
    pub fn snapshot(&self) -> HashMap<TaskId, TaskRecord> {
        let records = self.records.lock().unwrap();
        records.clone()
    }

    fn apply_patch(record: &mut TaskRecord, patch: RecordPatch) {
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(output) = patch.output {
            record.output = Some(output);
        }
        if let Some(next_tasks) = patch.next_tasks {
            record.next_tasks = Some(next_tasks);
        }
        if let Some(error) = patch.error {
            record.error = Some(error);
        }
        record.updated_at = Some(SystemTime::now());
    }
}

impl TaskStore for MemoryStore {
    fn get<'a>(
        &'a self,
        task_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TaskRecord>>> + Send + 'a>> {
        Box::pin(async move {
            let records = self.records.lock().unwrap();
            Ok(records.get(task_id).cloned())
        })
    }

    fn get_many<'a>(
        &'a self,
        task_ids: &'a [TaskId],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Option<TaskRecord>>>> + Send + 'a>> {
        Box::pin(async move {
            let records = self.records.lock().unwrap();
            Ok(task_ids.iter().map(|id| records.get(id).cloned()).collect())
        })
    }

    fn merge<'a>(
        &'a self,
        task_id: &'a str,
        patch: RecordPatch,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut records = self.records.lock().unwrap();
            let record = records.entry(task_id.to_string()).or_default();
            Self::apply_patch(record, patch);
            Ok(())
        })
    }
}
