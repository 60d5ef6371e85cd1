/// Frame-thread path: drain staging into the dispatch buffer and queue a flush
use super::core::{DispatchState, EventDispatcher};
use crate::error::DispatchError;
use crate::events::{Coalesced, Event};
use crate::utils::lock;
use std::sync::atomic::Ordering;
use std::thread;
use tracing::{debug, error, trace, trace_span};

/// What a single staged event did to the dispatch buffer.
enum Staged {
    Appended,
    /// One event was folded away onto an existing slot
    Folded,
}

impl DispatchState {
    /// Moves one staged event into the buffer, coalescing it with the
    /// surviving event for its cookie if it has one.
    ///
    /// On error the event has already been disposed.
    fn stage(&mut self, event: Box<dyn Event>) -> Result<Staged, DispatchError> {
        if !event.can_coalesce() {
            self.buffer.push(event);
            return Ok(Staged::Appended);
        }

        let cookie = match self.registry.cookie(event.view_tag(), event.event_name(), event.coalescing_key()) {
            Ok(cookie) => cookie,
            Err(error) => {
                event.dispose();
                return Err(error);
            }
        };

        let existing = self
            .cookie_to_index
            .get(&cookie)
            .copied()
            .and_then(|index| self.buffer.take(index).map(|existing| (index, existing)));

        let Some((index, existing)) = existing else {
            let index = self.buffer.push(event);
            self.cookie_to_index.insert(cookie, index);
            return Ok(Staged::Appended);
        };

        let survivor = match event.coalesce(existing.as_ref()) {
            Coalesced::TakeIncoming => {
                existing.dispose();
                event
            }
            Coalesced::KeepExisting => {
                event.dispose();
                existing
            }
            Coalesced::Merged(merged) => {
                existing.dispose();
                event.dispose();
                merged
            }
        };

        if let Err(survivor) = self.buffer.put(index, survivor) {
            let index = self.buffer.push(survivor);
            self.cookie_to_index.insert(cookie, index);
        }
        Ok(Staged::Folded)
    }
}

impl EventDispatcher {
    /// Frame callback body. Errors go to the host's exception handler.
    pub(super) fn schedule_dispatch_safe(&self) {
        if let Err(error) = self.schedule_dispatch() {
            error!("🔴 Event dispatch scheduling failed: {}", error);
            self.context.handle_exception(error);
        }
    }

    fn schedule_dispatch(&self) -> Result<(), DispatchError> {
        if !self.frame_source.is_frame_thread() {
            return Err(DispatchError::WrongThread {
                expected: self.frame_source.frame_thread(),
                actual: thread::current().id(),
            });
        }

        let span = trace_span!("schedule_dispatch");
        let _entered = span.enter();

        let (buffered, drain_result) = self.move_staged_events_to_dispatch_buffer();

        if buffered > 0 && !self.has_dispatch_scheduled.swap(true, Ordering::AcqRel) {
            trace!(buffered, "queueing flush on the JS thread");
            let dispatcher = self.self_ref.clone();
            self.context.run_on_js_queue(Box::new(move || {
                if let Some(dispatcher) = dispatcher.upgrade() {
                    dispatcher.dispatch_events_safe();
                }
            }));
        }

        drain_result
    }

    /// Drains staging under both locks. Returns the buffer length afterwards
    /// and the first error hit while staging, if any.
    ///
    /// Staging is always emptied and the frame callback deactivated, even when
    /// an event could not be registered.
    fn move_staged_events_to_dispatch_buffer(&self) -> (usize, Result<(), DispatchError>) {
        let mut staging = lock(&self.staging);
        let mut first_error = None;

        let buffered = {
            let mut state = lock(&self.dispatch);
            let drained = staging.len();
            let mut folded = 0u64;

            for event in staging.drain(..) {
                match state.stage(event) {
                    Ok(Staged::Appended) => {}
                    Ok(Staged::Folded) => folded += 1,
                    Err(error) => {
                        first_error.get_or_insert(error);
                    }
                }
            }

            self.stats.frames_drained.fetch_add(1, Ordering::Relaxed);
            self.stats.events_coalesced.fetch_add(folded, Ordering::Relaxed);
            self.stats.buffer_capacity.store(state.buffer.capacity(), Ordering::Relaxed);
            self.stats.registered_event_types.store(state.registry.len(), Ordering::Relaxed);

            if drained > 0 {
                debug!("Drained {} staged events ({} coalesced, {} buffered)", drained, folded, state.buffer.len());
            }
            state.buffer.len()
        };

        // Still under the staging lock so a concurrent producer's activation
        // cannot be lost.
        self.frame_source.deactivate_callback(&self.config.callback_name);

        (buffered, first_error.map_or(Ok(()), Err))
    }
}
