use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use taskrelay::engine::{TaskHandler, TriggerContext};

/// Handler that returns a fixed output and records the dependency inputs
/// it was given, once per invocation.
#[derive(Debug, Clone)]
pub struct ScriptedHandler {
    output: String,
    inputs_seen: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedHandler {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            inputs_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All input sequences seen so far, in invocation order.
    pub fn inputs_seen(&self) -> Vec<Vec<String>> {
        self.inputs_seen.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> usize {
        self.inputs_seen.lock().unwrap().len()
    }
}

impl TaskHandler for ScriptedHandler {
    fn run<'a>(
        &'a self,
        _ctx: &'a TriggerContext,
        inputs: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.inputs_seen.lock().unwrap().push(inputs);
            Ok(self.output.clone())
        })
    }
}

/// Handler that always fails with a fixed message.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: String,
}

impl FailingHandler {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TaskHandler for FailingHandler {
    fn run<'a>(
        &'a self,
        _ctx: &'a TriggerContext,
        _inputs: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move { Err(anyhow!("{}", self.message)) })
    }
}
