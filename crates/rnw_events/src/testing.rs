//! Shared mocks for unit tests.

use crate::context::ExceptionHandler;
use crate::emitter::JsEventEmitter;
use crate::error::DispatchError;
use crate::events::{Coalesced, Event, EventCore};
use crate::queue::{JsExecutor, JsTask};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One call observed by [`RecordingEmitter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
    Event {
        view_tag: i32,
        event_name: String,
        payload: Value,
    },
    Touches {
        event_name: String,
        touches: Vec<Value>,
        changed_indices: Vec<usize>,
    },
}

#[derive(Debug, Default)]
pub struct RecordingEmitter {
    emitted: Mutex<Vec<Emitted>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Emitted> {
        std::mem::take(&mut *self.emitted.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.emitted.lock().unwrap().len()
    }

    /// `(view_tag, event_name, payload)` of every scalar emission, in order.
    pub fn events(&self) -> Vec<(i32, String, Value)> {
        self.emitted
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Emitted::Event {
                    view_tag,
                    event_name,
                    payload,
                } => Some((*view_tag, event_name.clone(), payload.clone())),
                Emitted::Touches { .. } => None,
            })
            .collect()
    }
}

impl JsEventEmitter for RecordingEmitter {
    fn receive_event(&self, view_tag: i32, event_name: &str, payload: Value) {
        self.emitted.lock().unwrap().push(Emitted::Event {
            view_tag,
            event_name: event_name.to_string(),
            payload,
        });
    }

    fn receive_touches(&self, event_name: &str, touches: Vec<Value>, changed_indices: Vec<usize>) {
        self.emitted.lock().unwrap().push(Emitted::Touches {
            event_name: event_name.to_string(),
            touches,
            changed_indices,
        });
    }
}

/// How a [`TestEvent`] folds onto an existing partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// The platform default: newest wins.
    Newest,
    /// Always keep the buffered event.
    KeepExisting,
    /// Build a new event whose value is `existing.value + self.value`.
    Sum,
}

/// Configurable event that counts its own disposals.
#[derive(Debug)]
pub struct TestEvent {
    core: EventCore,
    name: String,
    pub value: i64,
    coalescible: bool,
    key: u16,
    policy: MergePolicy,
    disposals: Arc<AtomicUsize>,
}

impl TestEvent {
    pub fn new(view_tag: i32, name: &str) -> Self {
        Self {
            core: EventCore::new(view_tag),
            name: name.to_string(),
            value: 0,
            coalescible: false,
            key: 0,
            policy: MergePolicy::Newest,
            disposals: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn at(view_tag: i32, name: &str, timestamp: Duration) -> Self {
        Self {
            core: EventCore::with_timestamp(view_tag, timestamp),
            ..Self::new(view_tag, name)
        }
    }

    pub fn coalescible(mut self, key: u16, policy: MergePolicy) -> Self {
        self.coalescible = true;
        self.key = key;
        self.policy = policy;
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    pub fn counting(mut self, disposals: &Arc<AtomicUsize>) -> Self {
        self.disposals = disposals.clone();
        self
    }
}

impl Event for TestEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn event_name(&self) -> &str {
        &self.name
    }

    fn can_coalesce(&self) -> bool {
        self.coalescible
    }

    fn coalescing_key(&self) -> u16 {
        self.key
    }

    fn coalesce(&self, existing: &dyn Event) -> Coalesced {
        match self.policy {
            MergePolicy::Newest => {
                if self.timestamp() >= existing.timestamp() {
                    Coalesced::TakeIncoming
                } else {
                    Coalesced::KeepExisting
                }
            }
            MergePolicy::KeepExisting => Coalesced::KeepExisting,
            MergePolicy::Sum => {
                let existing_value = existing_value(existing);
                Coalesced::Merged(Box::new(TestEvent {
                    core: EventCore::with_timestamp(self.view_tag(), self.timestamp()),
                    name: self.name.clone(),
                    value: existing_value + self.value,
                    coalescible: true,
                    key: self.key,
                    policy: self.policy,
                    disposals: self.disposals.clone(),
                }))
            }
        }
    }

    fn dispatch(&self, emitter: &dyn JsEventEmitter) {
        emitter.receive_event(self.view_tag(), &self.name, json!({ "value": self.value }));
    }

    fn dispose(self: Box<Self>) {
        self.disposals.fetch_add(1, Ordering::SeqCst);
    }
}

fn existing_value(existing: &dyn Event) -> i64 {
    // Dispatch into a scratch emitter to read the value back without downcasting.
    let scratch = RecordingEmitter::new();
    existing.dispatch(&scratch);
    scratch
        .events()
        .first()
        .and_then(|(_, _, payload)| payload["value"].as_i64())
        .unwrap_or(0)
}

/// JS queue that holds tasks until the test runs them.
#[derive(Default)]
pub struct ManualJsQueue {
    tasks: Mutex<Vec<JsTask>>,
}

impl ManualJsQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Runs every queued task, including tasks queued while running.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let batch = std::mem::take(&mut *self.tasks.lock().unwrap());
            if batch.is_empty() {
                return ran;
            }
            for task in batch {
                task();
                ran += 1;
            }
        }
    }
}

impl std::fmt::Debug for ManualJsQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualJsQueue").field("pending", &self.pending()).finish()
    }
}

impl JsExecutor for ManualJsQueue {
    fn run_on_js_queue(&self, task: JsTask) {
        self.tasks.lock().unwrap().push(task);
    }
}

#[derive(Debug, Default)]
pub struct RecordingExceptionHandler {
    errors: Mutex<Vec<DispatchError>>,
}

impl RecordingExceptionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<DispatchError> {
        self.errors.lock().unwrap().clone()
    }
}

impl ExceptionHandler for RecordingExceptionHandler {
    fn handle_exception(&self, error: DispatchError) {
        self.errors.lock().unwrap().push(error);
    }
}
