//! The JavaScript-side event emitter that flushed events are delivered to.
//!
//! This is the `RCTEventEmitter` JavaScript module as seen from native code.
//! Every [`Event`](crate::Event) picks one of the two shapes when dispatched.

use serde_json::Value;
use std::fmt::Debug;

/// Receiver for dispatched events, invoked on the JS-queue thread.
pub trait JsEventEmitter: Send + Sync + Debug {
    /// Delivers a scalar event addressed to a single view.
    fn receive_event(&self, view_tag: i32, event_name: &str, payload: Value);

    /// Delivers a multi-touch batch. `changed_indices` index into `touches`.
    fn receive_touches(&self, event_name: &str, touches: Vec<Value>, changed_indices: Vec<usize>);
}
