// src/pipeline.rs

//! Local trigger loop: an in-process stand-in for the external
//! creation-event mechanism.
//!
//! In a real deployment every task record creation is delivered to the
//! engine by the hosting trigger infrastructure. For the CLI and the
//! end-to-end tests, [`Pipeline`] plays that role: it seeds every non-root
//! record as queued, invokes the engine for each root, and after each
//! successful run delivers an invocation (FIFO, once per task) to every
//! declared child the dispatcher advanced to processing.
//!
//! The FIFO ordering makes the multi-parent dispatch race deterministic
//! here; real deployments only get the per-record guarantees described by
//! the engine itself.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::alert::Alerter;
use crate::config::PipelineFile;
use crate::engine::{Engine, TaskHandler, TaskSpec, TriggerContext};
use crate::errors::Result;
use crate::store::{RecordPatch, StoreClient, TaskId, TaskRecord, TaskStatus, TaskStore};

/// Fallback handler used when no task-specific logic is registered.
///
/// Produces `"Task{id} completed"`, which is plenty for demonstrating how
/// outputs flow through the graph.
#[derive(Debug, Clone, Default)]
pub struct EchoHandler;

impl TaskHandler for EchoHandler {
    fn run<'a>(
        &'a self,
        ctx: &'a TriggerContext,
        inputs: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let id = ctx.task_id.clone().unwrap_or_default();
            debug!(task = %id, ?inputs, "echo handler invoked");
            Ok(format!("Task{id} completed"))
        })
    }
}

/// Final state of one pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Tasks the loop invoked the engine for, in invocation order.
    pub executed: Vec<TaskId>,
    /// Final record of every declared task (`None` if never written).
    pub records: BTreeMap<TaskId, Option<TaskRecord>>,
}

impl PipelineReport {
    pub fn record(&self, task_id: &str) -> Option<&TaskRecord> {
        self.records.get(task_id).and_then(|r| r.as_ref())
    }
}

/// Drives a whole declared graph through the engine, one task at a time.
pub struct Pipeline {
    engine: Engine,
    client: StoreClient,
    specs: BTreeMap<TaskId, TaskSpec>,
    handlers: HashMap<TaskId, Arc<dyn TaskHandler>>,
    fallback: Arc<dyn TaskHandler>,
}

impl Pipeline {
    pub fn new(
        config: &PipelineFile,
        store: Arc<dyn TaskStore>,
        alerter: Arc<dyn Alerter>,
    ) -> Self {
        let client = StoreClient::new(store, Arc::clone(&alerter));
        Self::with_client(config, client, alerter)
    }

    /// Construct with a pre-configured client (tests tune the retry policy).
    pub fn with_client(
        config: &PipelineFile,
        client: StoreClient,
        alerter: Arc<dyn Alerter>,
    ) -> Self {
        let engine = Engine::with_client(client.clone(), alerter);
        let specs = config
            .specs()
            .into_iter()
            .map(|spec| (spec.id.clone(), spec))
            .collect();

        Self {
            engine,
            client,
            specs,
            handlers: HashMap::new(),
            fallback: Arc::new(EchoHandler),
        }
    }

    /// Register task-specific logic; unregistered tasks fall back to
    /// [`EchoHandler`].
    pub fn with_handler(mut self, task_id: impl Into<TaskId>, handler: Arc<dyn TaskHandler>) -> Self {
        self.handlers.insert(task_id.into(), handler);
        self
    }

    /// Run the graph to quiescence.
    ///
    /// Engine failures are logged and do not abort the rest of the run; the
    /// failed task's children simply never advance past queued, which the
    /// report makes visible.
    pub async fn run(&self) -> Result<PipelineReport> {
        self.seed_queued_records().await?;

        let roots: Vec<TaskId> = self
            .specs
            .values()
            .filter(|spec| spec.parents.is_empty())
            .map(|spec| spec.id.clone())
            .collect();

        info!(?roots, "pipeline run starting from roots");

        let mut queue: VecDeque<TaskId> = roots.iter().cloned().collect();
        let mut enqueued: HashSet<TaskId> = roots.into_iter().collect();
        let mut executed = Vec::new();

        while let Some(task_id) = queue.pop_front() {
            let Some(spec) = self.specs.get(&task_id) else {
                warn!(task = %task_id, "enqueued task has no declared spec; skipping");
                continue;
            };

            let handler = self
                .handlers
                .get(&task_id)
                .cloned()
                .unwrap_or_else(|| Arc::clone(&self.fallback));

            let snapshot = self.client.get_record(&task_id).await?;
            let ctx = TriggerContext {
                task_id: Some(task_id.clone()),
                snapshot,
            };

            executed.push(task_id.clone());

            match self.engine.run(spec, handler.as_ref(), &ctx).await {
                Ok(output) => {
                    debug!(task = %task_id, %output, "engine invocation fulfilled");
                    self.enqueue_advanced_children(spec, &mut queue, &mut enqueued)
                        .await?;
                }
                Err(err) => {
                    // Already recorded and alerted by the engine.
                    warn!(task = %task_id, error = %err, "engine invocation failed");
                }
            }
        }

        self.build_report(executed).await
    }

    /// Records are implicitly created by their first write; for non-root
    /// tasks that first write is this queued seed, which is what makes them
    /// eligible for dispatch later.
    async fn seed_queued_records(&self) -> Result<()> {
        for spec in self.specs.values() {
            if !spec.parents.is_empty() {
                self.client
                    .update_atomically(&spec.id, RecordPatch::status(TaskStatus::Queued))
                    .await?;
            }
        }
        Ok(())
    }

    /// Deliver "creation events" for children the dispatcher advanced.
    async fn enqueue_advanced_children(
        &self,
        spec: &TaskSpec,
        queue: &mut VecDeque<TaskId>,
        enqueued: &mut HashSet<TaskId>,
    ) -> Result<()> {
        for child in &spec.children {
            if enqueued.contains(child) {
                continue;
            }

            let advanced = matches!(
                self.client.get_record(child).await?,
                Some(record) if record.status == TaskStatus::Processing
            );

            if advanced {
                enqueued.insert(child.clone());
                queue.push_back(child.clone());
            }
        }
        Ok(())
    }

    async fn build_report(&self, executed: Vec<TaskId>) -> Result<PipelineReport> {
        let mut records = BTreeMap::new();
        for id in self.specs.keys() {
            records.insert(id.clone(), self.client.get_record(id).await?);
        }
        Ok(PipelineReport { executed, records })
    }
}
