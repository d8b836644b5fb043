use std::sync::{Arc, Mutex};

use taskrelay::alert::Alerter;

/// Alerter that records every (message, detail) pair for assertions.
#[derive(Debug, Clone, Default)]
pub struct CollectingAlerter {
    alerts: Arc<Mutex<Vec<(String, String)>>>,
}

impl CollectingAlerter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.lock().unwrap().is_empty()
    }
}

impl Alerter for CollectingAlerter {
    fn alert(&self, message: &str, detail: &str) {
        let mut alerts = self.alerts.lock().unwrap();
        alerts.push((message.to_string(), detail.to_string()));
    }
}
