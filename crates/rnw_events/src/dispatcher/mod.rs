//! # Event Dispatcher
//!
//! The funnel between native UI callbacks and the JavaScript runtime.
//!
//! ## Cycle
//!
//! 1. **Idle** - nothing staged, no flush queued.
//! 2. **Staged** - [`EventDispatcher::dispatch_event`] appended to the staging
//!    list from any thread and activated the frame callback.
//! 3. **Queued** - the frame callback drained staging into the dispatch
//!    buffer, folding coalescible events that share a cookie, and queued one
//!    flush on the JS thread.
//! 4. **Flushing** - the JS thread sorts the buffer by
//!    `(timestamp, sorting_key)`, dispatches and disposes every event, then
//!    clears the buffer for the next cycle.
//!
//! ## Locks
//!
//! Staging and the dispatch state sit behind two independent mutexes. A drain
//! holds the staging lock and takes the dispatch lock inside it; producers only
//! touch staging and the flush only touches the dispatch state.

mod core;
mod drain;
mod flush;
mod lifecycle;
mod staging;
mod stats;

pub use self::core::EventDispatcher;
pub use self::stats::DispatcherStats;
