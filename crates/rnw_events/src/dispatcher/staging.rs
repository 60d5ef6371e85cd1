/// Producer-side entry points: staging and listener registration
use super::core::EventDispatcher;
use crate::events::Event;
use crate::listener::EventDispatcherListener;
use crate::utils::{lock, read, write};
use std::sync::atomic::Ordering;
use std::sync::Arc;

impl EventDispatcher {
    /// Hands `event` to the dispatcher. Safe to call from any thread.
    ///
    /// Every registered listener sees the event first, synchronously, on the
    /// calling thread. The event is then staged for the next frame and the
    /// frame callback is activated.
    ///
    /// The dispatcher does not know about view lifecycle; producers must not
    /// create events for views that are no longer mounted.
    pub fn dispatch_event(&self, event: Box<dyn Event>) {
        // Snapshot so listeners may (un)register without deadlocking.
        let listeners = read(&self.listeners).clone();
        for listener in &listeners {
            listener.on_event_dispatch(event.as_ref());
        }

        self.stats.events_received.fetch_add(1, Ordering::Relaxed);
        lock(&self.staging).push(event);

        self.frame_source.activate_callback(&self.config.callback_name);
    }

    pub fn add_listener(&self, listener: Arc<dyn EventDispatcherListener>) {
        write(&self.listeners).push(listener);
    }

    /// Removes `listener` by identity. Returns false if it was not registered.
    pub fn remove_listener(&self, listener: &Arc<dyn EventDispatcherListener>) -> bool {
        let mut listeners = write(&self.listeners);
        let target = Arc::as_ptr(listener) as *const ();
        match listeners.iter().position(|l| Arc::as_ptr(l) as *const () == target) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        read(&self.listeners).len()
    }

    /// Events waiting for the next frame callback.
    pub fn staged_len(&self) -> usize {
        lock(&self.staging).len()
    }
}
