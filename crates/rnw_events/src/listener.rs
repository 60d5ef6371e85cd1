//! Observers notified for every event handed to the dispatcher.

use crate::events::Event;

/// Synchronous hook invoked on the producer's thread for every
/// [`EventDispatcher::dispatch_event`](crate::EventDispatcher::dispatch_event)
/// call, before the event is staged.
///
/// Listeners only get a shared reference; they cannot change the view tag,
/// name or coalescing key the event will be grouped by.
pub trait EventDispatcherListener: Send + Sync {
    fn on_event_dispatch(&self, event: &dyn Event);
}

/// Traces every event at `trace` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventListener;

impl EventDispatcherListener for TracingEventListener {
    fn on_event_dispatch(&self, event: &dyn Event) {
        tracing::trace!(
            view_tag = event.view_tag(),
            event_name = event.event_name(),
            coalescible = event.can_coalesce(),
            sorting_key = event.sorting_key(),
            "event received"
        );
    }
}
