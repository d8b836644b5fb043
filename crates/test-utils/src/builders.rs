#![allow(dead_code)]

use std::collections::BTreeMap;

use taskrelay::config::{PipelineFile, RawPipelineFile, TaskEntry};

/// Builder for `PipelineFile` to simplify test setup.
pub struct PipelineFileBuilder {
    raw: RawPipelineFile,
}

impl PipelineFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawPipelineFile {
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, id: &str, entry: TaskEntry) -> Self {
        self.raw.task.insert(id.to_string(), entry);
        self
    }

    pub fn build(self) -> PipelineFile {
        PipelineFile::try_from(self.raw).expect("Failed to build valid pipeline from builder")
    }
}

impl Default for PipelineFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskEntry`.
pub struct TaskEntryBuilder {
    entry: TaskEntry,
}

impl TaskEntryBuilder {
    pub fn new() -> Self {
        Self {
            entry: TaskEntry {
                after: vec![],
                next: vec![],
            },
        }
    }

    pub fn after(mut self, parent: &str) -> Self {
        self.entry.after.push(parent.to_string());
        self
    }

    pub fn next(mut self, child: &str) -> Self {
        self.entry.next.push(child.to_string());
        self
    }

    pub fn build(self) -> TaskEntry {
        self.entry
    }
}

impl Default for TaskEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The canonical five-task example graph:
///
/// ```text
/// A -> B, C
/// B -> D
/// C -> D, E
/// D -> E
/// ```
///
/// B and C consume A's output; D consumes B and C; E consumes C and D.
pub fn five_task_graph() -> PipelineFile {
    PipelineFileBuilder::new()
        .with_task("A", TaskEntryBuilder::new().next("B").next("C").build())
        .with_task("B", TaskEntryBuilder::new().after("A").next("D").build())
        .with_task(
            "C",
            TaskEntryBuilder::new().after("A").next("D").next("E").build(),
        )
        .with_task(
            "D",
            TaskEntryBuilder::new().after("B").after("C").next("E").build(),
        )
        .with_task("E", TaskEntryBuilder::new().after("C").after("D").build())
        .build()
}
