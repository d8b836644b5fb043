// src/engine/mod.rs

//! Orchestration engine for taskrelay.
//!
//! One engine invocation drives a single task through its lifecycle:
//! initialize, fetch dependency outputs, run the caller-supplied task
//! logic, record the result, and advance the declared children.
//!
//! - [`resolver`] gathers parent outputs in one batched read.
//! - [`dispatch`] advances eligible children from queued to processing.
//! - [`runner`] sequences the whole state machine.
//!
//! The engine never schedules tasks by itself; it reacts to one external
//! invocation per task and relies on the surrounding trigger mechanism to
//! deliver an invocation for each child it advances.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;

use crate::store::{TaskId, TaskRecord};

pub mod dispatch;
pub mod resolver;
pub mod runner;

pub use dispatch::ChildDispatcher;
pub use resolver::DependencyResolver;
pub use runner::Engine;

/// Static, caller-declared topology for one task.
///
/// Parents and children are configuration, not data the engine infers from
/// the stored graph. Both lists are ordered: parent order determines the
/// order of dependency outputs, child order the order of dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub id: TaskId,
    pub parents: Vec<TaskId>,
    pub children: Vec<TaskId>,
}

impl TaskSpec {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Invocation context handed to the engine by the external trigger
/// mechanism.
///
/// `task_id` may be absent when the trigger was malformed; the engine
/// treats that as a configuration error. `snapshot` optionally carries the
/// record as it looked when the triggering event fired.
#[derive(Debug, Clone, Default)]
pub struct TriggerContext {
    pub task_id: Option<TaskId>,
    pub snapshot: Option<TaskRecord>,
}

impl TriggerContext {
    pub fn for_task(task_id: impl Into<TaskId>) -> Self {
        Self {
            task_id: Some(task_id.into()),
            snapshot: None,
        }
    }
}

/// Caller-supplied task logic.
///
/// This is the only caller-visible extension point: ordered dependency
/// outputs in, a result string (or failure) out. Implementations are free
/// to perform their own I/O; a failure here follows the rejected path.
pub trait TaskHandler: Send + Sync {
    fn run<'a>(
        &'a self,
        ctx: &'a TriggerContext,
        inputs: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}
