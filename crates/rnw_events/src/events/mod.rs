//! # Event Model
//!
//! This module defines the [`Event`] trait that every native UI occurrence
//! implements before it is handed to the [`EventDispatcher`](crate::EventDispatcher),
//! together with the shared [`EventCore`] header and the built-in event types
//! produced by the view layer.
//!
//! ## Ownership
//!
//! Producers construct an event the moment the native callback fires and pass
//! it to the dispatcher as a `Box<dyn Event>`. From that point the dispatcher
//! owns it: the event is either disposed during coalescing or dispatched to
//! JavaScript and then disposed. Both paths consume the box, so no event can be
//! dispatched or disposed twice.
//!
//! ## Built-in Events
//!
//! - [`KeyEvent`] - `topKeyDown` / `topKeyUp`
//! - [`FocusEvent`] / [`BlurEvent`] - `topFocus` / `topBlur`
//! - [`TouchEvent`] - multi-touch batches delivered through `receiveTouches`
//! - [`PointerEnterExitEvent`] - mouse enter/leave and over/out
//! - [`ScrollEvent`] - scroll view notifications

use crate::emitter::JsEventEmitter;
use std::fmt::Debug;
use std::time::Duration;

mod focus;
mod key;
mod ordering;
mod pointer;
mod scroll;
mod touch;

pub use focus::{BlurEvent, FocusEvent};
pub use key::KeyEvent;
pub use ordering::{event_order, monotonic_now, next_sorting_key};
pub use pointer::{PointerEnterExitEvent, ReactPointer};
pub use scroll::{ScrollEvent, ScrollEventType};
pub use touch::{TouchEvent, TouchEventType};

/// View tag used by events that are not scoped to a single view.
pub const NO_VIEW_TAG: i32 = -1;

/// Header shared by every event: target view, time of occurrence and the
/// creation-order tie breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCore {
    view_tag: i32,
    timestamp: Duration,
    sorting_key: u64,
}

impl EventCore {
    /// Stamps a new header for `view_tag` with the current monotonic time.
    pub fn new(view_tag: i32) -> Self {
        Self::with_timestamp(view_tag, monotonic_now())
    }

    /// Stamps a new header with a timestamp supplied by the native source.
    ///
    /// The sorting key is still drawn from the process-wide counter so events
    /// created in sequence keep their relative order when timestamps collide.
    pub fn with_timestamp(view_tag: i32, timestamp: Duration) -> Self {
        Self {
            view_tag,
            timestamp,
            sorting_key: next_sorting_key(),
        }
    }

    pub fn view_tag(&self) -> i32 {
        self.view_tag
    }

    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    pub fn sorting_key(&self) -> u64 {
        self.sorting_key
    }
}

/// Result of folding an incoming event into the one already buffered for the
/// same cookie.
#[derive(Debug)]
pub enum Coalesced {
    /// The incoming event takes the slot; the existing event is disposed.
    TakeIncoming,
    /// The existing event already covers the incoming one, which is disposed.
    KeepExisting,
    /// A new event built from both takes the slot; both inputs are disposed.
    Merged(Box<dyn Event>),
}

/// Core trait for native UI events bound for JavaScript.
///
/// Implementations embed an [`EventCore`] and override the coalescing hooks
/// when the default policy does not fit. The defaults mirror the platform
/// event base: events are coalescible, use coalescing key `0`, and coalescing
/// keeps whichever event is newer.
///
/// # Examples
///
/// ```rust
/// use rnw_events::{Event, EventCore, JsEventEmitter};
///
/// #[derive(Debug)]
/// struct ValueChanged {
///     core: EventCore,
///     value: f64,
/// }
///
/// impl Event for ValueChanged {
///     fn core(&self) -> &EventCore {
///         &self.core
///     }
///
///     fn event_name(&self) -> &str {
///         "topChange"
///     }
///
///     fn dispatch(&self, emitter: &dyn JsEventEmitter) {
///         emitter.receive_event(
///             self.view_tag(),
///             self.event_name(),
///             serde_json::json!({ "target": self.view_tag(), "value": self.value }),
///         );
///     }
/// }
/// ```
pub trait Event: Send + Debug + 'static {
    /// The header stamped at construction.
    fn core(&self) -> &EventCore;

    /// The logical JavaScript event name, such as `topTouchMove`.
    fn event_name(&self) -> &str;

    /// Delivers this event to the JavaScript side.
    fn dispatch(&self, emitter: &dyn JsEventEmitter);

    /// Whether a newer event with the same cookie may replace this one before
    /// dispatch.
    fn can_coalesce(&self) -> bool {
        true
    }

    /// Groups replaceable events, e.g. all moves of the same pointer.
    fn coalescing_key(&self) -> u16 {
        0
    }

    /// Folds `self` (the newer event) onto `existing` (the buffered one).
    ///
    /// Must not mutate either event; a merge returns a fresh event instead.
    fn coalesce(&self, existing: &dyn Event) -> Coalesced {
        if self.timestamp() >= existing.timestamp() {
            Coalesced::TakeIncoming
        } else {
            Coalesced::KeepExisting
        }
    }

    /// Releases the event. Called exactly once by the dispatcher.
    fn dispose(self: Box<Self>) {}

    fn view_tag(&self) -> i32 {
        self.core().view_tag()
    }

    fn timestamp(&self) -> Duration {
        self.core().timestamp()
    }

    fn sorting_key(&self) -> u64 {
        self.core().sorting_key()
    }
}
