//! The pump's stand-in for the JavaScript `RCTEventEmitter` module.

use rnw_events::JsEventEmitter;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Logs every delivery and counts them per event name.
#[derive(Debug, Default)]
pub struct LoggingEventEmitter {
    counts: Mutex<BTreeMap<String, u64>>,
}

impl LoggingEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries per event name so far.
    pub fn counts(&self) -> BTreeMap<String, u64> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn total(&self) -> u64 {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner).values().sum()
    }

    fn record(&self, event_name: &str) {
        *self
            .counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event_name.to_string())
            .or_default() += 1;
    }
}

impl JsEventEmitter for LoggingEventEmitter {
    fn receive_event(&self, view_tag: i32, event_name: &str, payload: Value) {
        debug!(view_tag, event_name, %payload, "receiveEvent");
        self.record(event_name);
    }

    fn receive_touches(&self, event_name: &str, touches: Vec<Value>, changed_indices: Vec<usize>) {
        debug!(event_name, touches = touches.len(), ?changed_indices, "receiveTouches");
        self.record(event_name);
    }
}
