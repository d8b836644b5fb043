// src/engine/resolver.rs

//! Dependency resolution: turn a declared parent list into the ordered
//! sequence of dependency outputs the task logic consumes.

use anyhow::Result;
use tracing::debug;

use crate::store::{StoreClient, TaskId};

/// Fetches recorded parent outputs in one batched read.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    client: StoreClient,
}

impl DependencyResolver {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    /// Resolve the outputs for `parent_ids`.
    ///
    /// - An empty parent list short-circuits: no store access at all.
    /// - Otherwise one batched read; position `i` of the result corresponds
    ///   to `parent_ids[i]`, with an empty string standing in for any parent
    ///   whose record or output is missing.
    pub async fn resolve(&self, parent_ids: &[TaskId]) -> Result<Vec<String>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let outputs = self.client.get_outputs(parent_ids).await?;
        debug!(parents = ?parent_ids, count = outputs.len(), "resolved dependency outputs");
        Ok(outputs)
    }
}
