// src/config/model.rs

//! TOML model for a pipeline topology file.
//!
//! ```toml
//! [task.A]
//! next = ["B", "C"]
//!
//! [task.B]
//! after = ["A"]
//! next = ["D"]
//! ```
//!
//! `after` lists a task's parents (whose outputs it consumes, in order);
//! `next` lists the children it advances on completion. Both are static,
//! caller-declared configuration; the engine never derives topology from
//! the stored records.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::engine::TaskSpec;
use crate::store::TaskId;

/// One `[task.<id>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskEntry {
    /// Ordered parent identifiers.
    #[serde(default)]
    pub after: Vec<TaskId>,

    /// Ordered child identifiers.
    #[serde(default)]
    pub next: Vec<TaskId>,
}

/// Raw deserialized pipeline file, prior to validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPipelineFile {
    #[serde(default)]
    pub task: BTreeMap<TaskId, TaskEntry>,
}

/// Validated pipeline file.
///
/// Construction goes through `TryFrom<RawPipelineFile>` (see [`validate`]);
/// holders can rely on every `after`/`next` reference pointing at a
/// declared task.
///
/// [`validate`]: crate::config::validate
#[derive(Debug, Clone)]
pub struct PipelineFile {
    task: BTreeMap<TaskId, TaskEntry>,
}

impl PipelineFile {
    pub(crate) fn new_unchecked(task: BTreeMap<TaskId, TaskEntry>) -> Self {
        Self { task }
    }

    pub fn tasks(&self) -> &BTreeMap<TaskId, TaskEntry> {
        &self.task
    }

    /// Topology as engine task specs, in deterministic (sorted) order.
    pub fn specs(&self) -> Vec<TaskSpec> {
        self.task
            .iter()
            .map(|(id, entry)| TaskSpec {
                id: id.clone(),
                parents: entry.after.clone(),
                children: entry.next.clone(),
            })
            .collect()
    }

    /// Tasks with no declared parents; these seed a pipeline run.
    pub fn roots(&self) -> Vec<TaskId> {
        self.task
            .iter()
            .filter(|(_, entry)| entry.after.is_empty())
            .map(|(id, _)| id.clone())
            .collect()
    }
}
