use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use taskrelay::store::{MemoryStore, RecordPatch, TaskId, TaskRecord, TaskStore};

/// Store operations observed by [`RecordingStore`].
#[derive(Debug, Clone)]
pub enum StoreOp {
    Get(TaskId),
    GetMany(Vec<TaskId>),
    Merge { task: TaskId, patch: RecordPatch },
}

#[derive(Debug, Default)]
struct Faults {
    /// Fail this many merges before letting them through.
    fail_next_merges: u32,
    /// Fail every merge unconditionally.
    fail_all_merges: bool,
    /// `get` for these identifiers errors.
    fail_gets_for: HashSet<TaskId>,
    /// Fail every batched read.
    fail_get_many: bool,
}

/// A [`TaskStore`] wrapper around [`MemoryStore`] that:
/// - records every operation (so tests can assert e.g. "no read happened"
///   or "queued and processing were two separate writes")
/// - injects failures on demand (for retry and containment tests).
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    ops: Arc<Mutex<Vec<StoreOp>>>,
    faults: Arc<Mutex<Faults>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the wrapped store for seeding and direct assertions.
    pub fn memory(&self) -> MemoryStore {
        self.inner.clone()
    }

    pub fn record(&self, task_id: &str) -> Option<TaskRecord> {
        self.inner.record(task_id)
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn merges(&self) -> Vec<(TaskId, RecordPatch)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::Merge { task, patch } => Some((task, patch)),
                _ => None,
            })
            .collect()
    }

    pub fn get_many_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, StoreOp::GetMany(_)))
            .count()
    }

    pub fn merge_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, StoreOp::Merge { .. }))
            .count()
    }

    pub fn fail_next_merges(&self, count: u32) {
        self.faults.lock().unwrap().fail_next_merges = count;
    }

    pub fn fail_all_merges(&self, fail: bool) {
        self.faults.lock().unwrap().fail_all_merges = fail;
    }

    pub fn fail_gets_for(&self, task_id: impl Into<TaskId>) {
        self.faults.lock().unwrap().fail_gets_for.insert(task_id.into());
    }

    pub fn fail_get_many(&self, fail: bool) {
        self.faults.lock().unwrap().fail_get_many = fail;
    }

    fn push_op(&self, op: StoreOp) {
        self.ops.lock().unwrap().push(op);
    }
}

impl TaskStore for RecordingStore {
    fn get<'a>(
        &'a self,
        task_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TaskRecord>>> + Send + 'a>> {
        Box::pin(async move {
            self.push_op(StoreOp::Get(task_id.to_string()));

            if self.faults.lock().unwrap().fail_gets_for.contains(task_id) {
                return Err(anyhow!("injected read failure for '{task_id}'"));
            }

            self.inner.get(task_id).await
        })
    }

    fn get_many<'a>(
        &'a self,
        task_ids: &'a [TaskId],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Option<TaskRecord>>>> + Send + 'a>> {
        Box::pin(async move {
            self.push_op(StoreOp::GetMany(task_ids.to_vec()));

            if self.faults.lock().unwrap().fail_get_many {
                return Err(anyhow!("injected batched-read failure"));
            }

            self.inner.get_many(task_ids).await
        })
    }

    fn merge<'a>(
        &'a self,
        task_id: &'a str,
        patch: RecordPatch,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.push_op(StoreOp::Merge {
                task: task_id.to_string(),
                patch: patch.clone(),
            });

            {
                let mut faults = self.faults.lock().unwrap();
                if faults.fail_all_merges {
                    return Err(anyhow!("injected write failure for '{task_id}'"));
                }
                if faults.fail_next_merges > 0 {
                    faults.fail_next_merges -= 1;
                    return Err(anyhow!("injected transient write failure for '{task_id}'"));
                }
            }

            self.inner.merge(task_id, patch).await
        })
    }
}
