// src/engine/runner.rs

//! The state-machine driver for a single task invocation.
//!
//! Per invocation the engine sequences, strictly in order:
//! queued -> processing -> resolve dependencies -> run task logic ->
//! record the terminal state -> dispatch children (on success only).
//!
//! Queued and processing are two separate atomic writes rather than one, so
//! an external observer gets a brief "acknowledged but not yet computing"
//! state for monitoring. The engine does not deduplicate concurrent
//! invocations of the same task identifier.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::alert::Alerter;
use crate::errors::{Result, TaskRelayError};
use crate::store::{RecordPatch, StoreClient, TaskStatus, TaskStore};

use super::dispatch::ChildDispatcher;
use super::resolver::DependencyResolver;
use super::{TaskHandler, TaskSpec, TriggerContext};

pub struct Engine {
    client: StoreClient,
    resolver: DependencyResolver,
    dispatcher: ChildDispatcher,
    alerter: Arc<dyn Alerter>,
}

impl Engine {
    /// Wire up an engine against a store and an alerting collaborator.
    pub fn new(store: Arc<dyn TaskStore>, alerter: Arc<dyn Alerter>) -> Self {
        let client = StoreClient::new(store, Arc::clone(&alerter));
        Self::with_client(client, alerter)
    }

    /// Wire up an engine with a pre-configured client (e.g. a test retry
    /// policy).
    pub fn with_client(client: StoreClient, alerter: Arc<dyn Alerter>) -> Self {
        let resolver = DependencyResolver::new(client.clone());
        let dispatcher = ChildDispatcher::new(client.clone(), Arc::clone(&alerter));
        Self {
            client,
            resolver,
            dispatcher,
            alerter,
        }
    }

    /// Execute one task invocation end to end, returning the task's output.
    ///
    /// Failures during setup or task logic transition the record to
    /// rejected and are re-raised; the external trigger mechanism owns any
    /// retry or dead-letter policy beyond that.
    pub async fn run(
        &self,
        spec: &TaskSpec,
        handler: &dyn TaskHandler,
        ctx: &TriggerContext,
    ) -> Result<String> {
        let task_id = ctx.task_id.as_deref().ok_or_else(|| {
            TaskRelayError::ConfigError(
                "trigger context carries no task identifier".to_string(),
            )
        })?;

        info!(task = task_id, "task invocation started");

        // Two separate atomic writes by design: the queued state is
        // externally observable, however briefly.
        self.client
            .set_status(task_id, TaskStatus::Queued, RecordPatch::default())
            .await?;
        self.client
            .set_status(task_id, TaskStatus::Processing, RecordPatch::default())
            .await?;

        match self.resolve_and_execute(spec, handler, ctx).await {
            Ok(output) => self.fulfill(task_id, spec, output).await,
            Err(err) => self.reject(task_id, err).await,
        }
    }

    /// Steps 2 and 3: dependency fetch plus task logic. Either failure
    /// follows the rejected path.
    async fn resolve_and_execute(
        &self,
        spec: &TaskSpec,
        handler: &dyn TaskHandler,
        ctx: &TriggerContext,
    ) -> anyhow::Result<String> {
        let inputs = self.resolver.resolve(&spec.parents).await?;
        debug!(task = %spec.id, inputs = inputs.len(), "running task logic");
        handler.run(ctx, inputs).await
    }

    /// Record success in one atomic multi-field write, then dispatch the
    /// declared children. Dispatch failures are contained: the task itself
    /// has already reached its terminal state.
    async fn fulfill(&self, task_id: &str, spec: &TaskSpec, output: String) -> Result<String> {
        let mut patch = RecordPatch {
            output: Some(output.clone()),
            ..RecordPatch::default()
        };
        if !spec.children.is_empty() {
            patch.next_tasks = Some(spec.children.clone());
        }

        self.client
            .set_status(task_id, TaskStatus::Fulfilled, patch)
            .await?;

        info!(task = task_id, "task fulfilled");

        if let Err(err) = self.dispatcher.dispatch(task_id).await {
            self.alerter.alert(
                &format!("child dispatch for task '{task_id}' failed"),
                &format!("{err:#}"),
            );
        }

        Ok(output)
    }

    /// Record failure and re-raise it to the invoking context.
    ///
    /// The rejected write is best effort: if the store is down as well, the
    /// write failure is alerted by the client and the original task failure
    /// is still the one propagated.
    async fn reject(&self, task_id: &str, err: anyhow::Error) -> Result<String> {
        let message = err.to_string();
        warn!(task = task_id, error = %message, "task failed; recording rejection");

        let patch = RecordPatch {
            error: Some(message),
            ..RecordPatch::default()
        };
        if let Err(write_err) = self
            .client
            .set_status(task_id, TaskStatus::Rejected, patch)
            .await
        {
            warn!(task = task_id, error = %write_err, "could not record rejected state");
        }

        self.alerter.alert(
            &format!("task '{task_id}' was rejected"),
            &format!("{err:#}"),
        );

        Err(TaskRelayError::TaskFailed {
            task: task_id.to_string(),
            source: err,
        })
    }
}
