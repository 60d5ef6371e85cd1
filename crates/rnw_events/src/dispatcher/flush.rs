/// JS-thread path: sort, dispatch, dispose and clear
use super::core::EventDispatcher;
use crate::error::DispatchError;
use crate::utils::{lock, panic_message, read};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use tracing::{error, trace, trace_span};

impl EventDispatcher {
    pub(super) fn dispatch_events_safe(&self) {
        if let Err(error) = self.dispatch_events() {
            error!("🔴 Event flush failed: {}", error);
            self.context.handle_exception(error);
        }
    }

    /// Delivers the current cycle.
    ///
    /// The dispatch lock is held from the sort through the clear, so the next
    /// drain only ever sees an empty buffer. When no emitter is bound the
    /// buffered events are left in place for a later flush.
    ///
    /// An event whose dispatch panics is still disposed and the rest of the
    /// batch is delivered; the first such panic is returned as an error.
    fn dispatch_events(&self) -> Result<(), DispatchError> {
        let span = trace_span!("dispatch_events");
        let _entered = span.enter();

        let mut state = lock(&self.dispatch);
        // Cleared under the lock: a drain that misses this flush queues the next.
        self.has_dispatch_scheduled.store(false, Ordering::Release);

        let emitter = read(&self.emitter).clone().ok_or(DispatchError::EmitterNotBound)?;

        if state.buffer.len() > 1 {
            state.buffer.sort();
        }

        let mut dispatched = 0;
        let mut failed = 0;
        let mut first_error = None;
        for slot in state.buffer.occupied_mut() {
            let Some(event) = slot.take() else {
                continue;
            };
            match panic::catch_unwind(AssertUnwindSafe(|| event.dispatch(emitter.as_ref()))) {
                Ok(()) => dispatched += 1,
                Err(payload) => {
                    failed += 1;
                    first_error.get_or_insert(DispatchError::EventDispatchPanicked {
                        event_name: event.event_name().to_string(),
                        message: panic_message(payload.as_ref()),
                    });
                }
            }
            event.dispose();
        }

        state.buffer.clear();
        state.cookie_to_index.clear();
        drop(state);

        self.stats.record_flush(dispatched, failed);
        trace!(dispatched, failed, "flush complete");
        first_error.map_or(Ok(()), Err)
    }
}
