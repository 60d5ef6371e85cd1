//! Error types for the event dispatch pipeline.
//!
//! Every variant is a programming error rather than a transient fault. They
//! are never retried; the dispatcher logs them and hands them to the host's
//! exception handler.

use std::thread::ThreadId;

/// Fatal conditions raised while staging, coalescing or flushing events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// More distinct event names were seen than the 16-bit type id space holds
    #[error("Overflow of event type IDs: at most {limit} distinct event names are supported")]
    EventTypeIdOverflow { limit: usize },

    /// A flush ran before the host bound a JavaScript event emitter
    #[error("The JavaScript event emitter must be bound before events are dispatched")]
    EmitterNotBound,

    /// The frame callback fired on a thread other than the frame thread
    #[error("Frame callback invoked on {actual:?}, expected the frame thread {expected:?}")]
    WrongThread {
        expected: Option<ThreadId>,
        actual: ThreadId,
    },

    /// An event's `dispatch` panicked; the rest of the batch was still delivered
    #[error("Dispatch of '{event_name}' panicked: {message}")]
    EventDispatchPanicked { event_name: String, message: String },

    /// A lifecycle listener panicked; the remaining listeners were still notified
    #[error("Lifecycle listener panicked during {phase}: {message}")]
    LifecycleListenerPanicked { phase: String, message: String },

    /// Invalid dispatcher configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
