/// Lifecycle wiring: frame subscription and emitter binding
use super::core::EventDispatcher;
use crate::context::LifecycleEventListener;
use crate::utils::{lock, write};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl EventDispatcher {
    /// Drops the frame subscription. Already staged or queued events are not
    /// drained; they flush only if frames resume.
    fn clear_callback(&self) {
        if let Some(id) = lock(&self.frame_subscription).take() {
            self.frame_source.unsubscribe(id);
            debug!("Event dispatcher unsubscribed from frame callbacks");
        }
    }
}

impl LifecycleEventListener for EventDispatcher {
    fn on_resume(&self) {
        {
            let mut emitter = write(&self.emitter);
            if emitter.is_none() {
                *emitter = self.context.event_emitter();
                if emitter.is_none() {
                    warn!("🟡 Resumed before the JS event emitter was bound; flushes will fail until it is");
                }
            }
        }

        let mut subscription = lock(&self.frame_subscription);
        if subscription.is_some() {
            return;
        }

        let dispatcher = self.self_ref.clone();
        *subscription = Some(self.frame_source.subscribe(Arc::new(move || {
            if let Some(dispatcher) = dispatcher.upgrade() {
                dispatcher.schedule_dispatch_safe();
            }
        })));
        info!("✅ Event dispatcher subscribed to frame callbacks");
    }

    fn on_suspend(&self) {
        self.clear_callback();
    }

    fn on_destroy(&self) {
        self.clear_callback();
    }

    fn on_react_instance_dispose(&self) {
        self.clear_callback();
    }
}
