//! # RNW Event Dispatch
//!
//! The event funnel that sits between native UI callbacks (touch, pointer,
//! key, focus, scroll) and the JavaScript runtime. It batches native events
//! per UI frame, coalesces the ones JavaScript only needs the latest of, and
//! flushes each batch to the JS event emitter in timestamp order.
//!
//! ## Core Features
//!
//! - **Thread-safe staging**: any native thread may call
//!   [`EventDispatcher::dispatch_event`]
//! - **Coalescing**: events sharing a view, name and coalescing key fold into
//!   one per frame
//! - **Deterministic ordering**: flushes sort by `(timestamp, sorting_key)`
//! - **Exactly-once disposal**: every event is consumed by value, either while
//!   coalescing or after dispatch
//!
//! ## Architecture Overview
//!
//! - [`events`] - the [`Event`] trait and the built-in event types
//! - [`cookie`] - cookie packing and the event type registry
//! - [`buffer`] - the per-cycle dispatch buffer
//! - [`dispatcher`] - staging, drain, flush and lifecycle wiring
//! - [`choreographer`] - the per-frame callback source
//! - [`queue`] - the serial JS execution queue
//! - [`context`] - host services and lifecycle notifications
//!
//! ## Quick Start Example
//!
//! ```rust,no_run
//! use rnw_events::*;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct PrintEmitter;
//!
//! impl JsEventEmitter for PrintEmitter {
//!     fn receive_event(&self, view_tag: i32, event_name: &str, payload: serde_json::Value) {
//!         println!("{view_tag} {event_name} {payload}");
//!     }
//!
//!     fn receive_touches(&self, event_name: &str, touches: Vec<serde_json::Value>, changed: Vec<usize>) {
//!         println!("{event_name} {touches:?} {changed:?}");
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let js_queue = Arc::new(JsQueueThread::spawn("js")?);
//!     let context = Arc::new(ReactContext::new(js_queue));
//!     context.bind_event_emitter(Arc::new(PrintEmitter));
//!
//!     let choreographer = Arc::new(Choreographer::new());
//!     let dispatcher = EventDispatcher::new(context.clone(), choreographer.clone());
//!     context.on_host_resume();
//!
//!     let _frames = choreographer.spawn_frame_loop(std::time::Duration::from_millis(16))?;
//!     dispatcher.dispatch_event(Box::new(KeyEvent::key_down(5, 65)));
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod choreographer;
pub mod config;
pub mod context;
pub mod cookie;
pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod events;
pub mod listener;
pub mod queue;

mod utils;

#[cfg(test)]
mod testing;

pub use buffer::DispatchBuffer;
pub use choreographer::{Choreographer, FrameCallback, FrameCallbackSource, FrameLoop, SubscriptionId};
pub use config::DispatcherConfig;
pub use context::{
    ExceptionHandler, HostContext, LifecycleEventListener, LifecycleState, LoggingExceptionHandler, ReactContext,
};
pub use cookie::{event_cookie, EventTypeRegistry, MAX_EVENT_TYPES};
pub use dispatcher::{DispatcherStats, EventDispatcher};
pub use emitter::JsEventEmitter;
pub use error::DispatchError;
pub use events::{
    BlurEvent, Coalesced, Event, EventCore, FocusEvent, KeyEvent, PointerEnterExitEvent, ReactPointer, ScrollEvent,
    ScrollEventType, TouchEvent, TouchEventType, NO_VIEW_TAG,
};
pub use listener::{EventDispatcherListener, TracingEventListener};
pub use queue::{JsExecutor, JsQueueThread, JsTask};

/// Returns a one-line build description for startup logs.
pub fn build_info() -> String {
    format!("RNW event dispatch v{}", env!("CARGO_PKG_VERSION"))
}
