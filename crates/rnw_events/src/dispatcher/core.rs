/// Core EventDispatcher implementation
use super::stats::{DispatcherStats, StatsCounters};
use crate::buffer::DispatchBuffer;
use crate::choreographer::{FrameCallbackSource, SubscriptionId};
use crate::config::DispatcherConfig;
use crate::context::HostContext;
use crate::cookie::EventTypeRegistry;
use crate::emitter::JsEventEmitter;
use crate::error::DispatchError;
use crate::events::Event;
use crate::listener::EventDispatcherListener;
use crate::utils::{lock, read};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use tracing::info;

/// Everything the drain writes and the flush consumes.
#[derive(Debug)]
pub(super) struct DispatchState {
    pub buffer: DispatchBuffer,
    /// Slot holding the surviving event for each cookie this cycle
    pub cookie_to_index: HashMap<u64, usize>,
    pub registry: EventTypeRegistry,
}

/// Sends native events to JavaScript, coalescing them while JavaScript is
/// backed up.
///
/// Construct with [`EventDispatcher::new`]; the dispatcher registers itself
/// with the host for lifecycle notifications and starts receiving frame
/// callbacks on the first [`on_resume`](crate::LifecycleEventListener::on_resume).
pub struct EventDispatcher {
    pub(super) context: Arc<dyn HostContext>,
    pub(super) frame_source: Arc<dyn FrameCallbackSource>,
    pub(super) config: DispatcherConfig,
    /// Events handed over since the last drain, in arrival order
    pub(super) staging: Mutex<Vec<Box<dyn Event>>>,
    pub(super) dispatch: Mutex<DispatchState>,
    /// Set by the drain when it queues a flush, cleared by the flush
    pub(super) has_dispatch_scheduled: AtomicBool,
    pub(super) emitter: RwLock<Option<Arc<dyn JsEventEmitter>>>,
    pub(super) listeners: RwLock<Vec<Arc<dyn EventDispatcherListener>>>,
    pub(super) frame_subscription: Mutex<Option<SubscriptionId>>,
    pub(super) stats: StatsCounters,
    pub(super) self_ref: Weak<EventDispatcher>,
}

impl EventDispatcher {
    /// Creates a dispatcher with the default configuration.
    pub fn new(context: Arc<dyn HostContext>, frame_source: Arc<dyn FrameCallbackSource>) -> Arc<Self> {
        Self::build(context, frame_source, DispatcherConfig::default())
    }

    /// Creates a dispatcher after validating `config`.
    pub fn with_config(
        context: Arc<dyn HostContext>,
        frame_source: Arc<dyn FrameCallbackSource>,
        config: DispatcherConfig,
    ) -> Result<Arc<Self>, DispatchError> {
        config.validate()?;
        Ok(Self::build(context, frame_source, config))
    }

    fn build(
        context: Arc<dyn HostContext>,
        frame_source: Arc<dyn FrameCallbackSource>,
        config: DispatcherConfig,
    ) -> Arc<Self> {
        let capacity = config.initial_buffer_capacity;
        let dispatcher = Arc::new_cyclic(|self_ref| Self {
            context,
            frame_source,
            staging: Mutex::new(Vec::new()),
            dispatch: Mutex::new(DispatchState {
                buffer: DispatchBuffer::with_capacity(capacity),
                cookie_to_index: HashMap::new(),
                registry: EventTypeRegistry::new(),
            }),
            has_dispatch_scheduled: AtomicBool::new(false),
            emitter: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
            frame_subscription: Mutex::new(None),
            stats: StatsCounters::with_capacity(capacity),
            self_ref: self_ref.clone(),
            config,
        });

        let as_listener: Weak<EventDispatcher> = Arc::downgrade(&dispatcher);
        dispatcher.context.add_lifecycle_event_listener(as_listener);

        info!(
            "🔧 Event dispatcher created (callback '{}', buffer capacity {})",
            dispatcher.config.callback_name, capacity
        );
        dispatcher
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Current statistics snapshot. Safe to call from any thread, including
    /// from inside an emitter during a flush.
    pub fn stats(&self) -> DispatcherStats {
        self.stats.snapshot()
    }

    /// Whether the frame callback subscription is live.
    pub fn is_subscribed(&self) -> bool {
        lock(&self.frame_subscription).is_some()
    }

    pub fn has_dispatch_scheduled(&self) -> bool {
        self.has_dispatch_scheduled.load(Ordering::Acquire)
    }

    /// Whether a JS event emitter has been bound by `on_resume`.
    pub fn is_emitter_bound(&self) -> bool {
        read(&self.emitter).is_some()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("config", &self.config)
            .field("subscribed", &self.is_subscribed())
            .field("emitter_bound", &self.is_emitter_bound())
            .field("has_dispatch_scheduled", &self.has_dispatch_scheduled())
            .field("listeners", &read(&self.listeners).len())
            .finish()
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        if let Some(id) = lock(&self.frame_subscription).take() {
            self.frame_source.unsubscribe(id);
        }
    }
}
