//! Operational event recording

use std::sync::{Arc, Mutex};

/// Sink for operational events such as failed searches or deliveries
pub trait EventRecorder: Send + Sync {
    fn warning(&self, reason: &str, message: &str);
}

/// Records events to the log, tagged with the reporter name
#[derive(Debug, Clone)]
pub struct LogRecorder {
    source: String,
}

impl LogRecorder {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl EventRecorder for LogRecorder {
    fn warning(&self, reason: &str, message: &str) {
        log::warn!("[{}] {}: {}", self.source, reason, message);
    }
}

/// A recorded event: `(reason, message)`
pub type RecordedEvent = (String, String);

/// Keeps warnings in memory, for tests and `report` runs
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    warnings: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<RecordedEvent> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    pub fn reasons(&self) -> Vec<String> {
        self.warnings().into_iter().map(|(reason, _)| reason).collect()
    }
}

impl EventRecorder for MemoryRecorder {
    fn warning(&self, reason: &str, message: &str) {
        log::warn!("{}: {}", reason, message);
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push((reason.to_string(), message.to_string()));
        }
    }
}
