//! # Host Context Interface
//!
//! This module defines the seam between the event funnel and the hosting
//! runtime. The host owns the JS execution queue, knows which JS event emitter
//! module is bound, receives fatal errors, and drives application lifecycle
//! notifications.
//!
//! ## Core Services
//!
//! The [`HostContext`] provides:
//! - **JS Queue** - fire-and-forget scheduling onto the JS thread
//! - **Event Emitter** - the `RCTEventEmitter` module flushed events go to
//! - **Exception Handling** - the generic sink for fatal dispatch errors
//! - **Lifecycle Registration** - explicit listener registration
//!
//! [`ReactContext`] is the shipped implementation.

use crate::emitter::JsEventEmitter;
use crate::error::DispatchError;
use crate::queue::{JsExecutor, JsTask};
use crate::utils::{lock, panic_message, read, write};
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, RwLock, Weak};
use tracing::{debug, error, info};

// ============================================================================
// Host Context Interface
// ============================================================================

/// Services the hosting runtime provides to the event dispatcher.
pub trait HostContext: Send + Sync + Debug {
    /// Queues `task` on the JS execution thread.
    fn run_on_js_queue(&self, task: JsTask);

    /// The bound JS event emitter module, if the JS side is up.
    fn event_emitter(&self) -> Option<Arc<dyn JsEventEmitter>>;

    /// Reports a fatal error to the host's generic exception handler.
    fn handle_exception(&self, error: DispatchError);

    /// Registers `listener` for lifecycle notifications.
    ///
    /// The host holds the listener weakly; dropping the listener unregisters it.
    fn add_lifecycle_event_listener(&self, listener: Weak<dyn LifecycleEventListener>);
}

/// Application lifecycle notifications.
pub trait LifecycleEventListener: Send + Sync {
    /// The host became active.
    fn on_resume(&self);

    /// The host went to the background.
    fn on_suspend(&self);

    /// The host is shutting down.
    fn on_destroy(&self);

    /// The React instance is about to be disposed.
    fn on_react_instance_dispose(&self);
}

/// Sink for fatal dispatch errors.
pub trait ExceptionHandler: Send + Sync + Debug {
    fn handle_exception(&self, error: DispatchError);
}

/// Default handler: logs and carries on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingExceptionHandler;

impl ExceptionHandler for LoggingExceptionHandler {
    fn handle_exception(&self, error: DispatchError) {
        error!("🔴 Unhandled event dispatch error: {}", error);
    }
}

// ============================================================================
// ReactContext
// ============================================================================

/// Lifecycle phase most recently broadcast by a [`ReactContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    BeforeResume,
    Resumed,
    Suspended,
    Destroyed,
    Disposed,
}

/// The shipped host context.
pub struct ReactContext {
    js_queue: Arc<dyn JsExecutor>,
    emitter: RwLock<Option<Arc<dyn JsEventEmitter>>>,
    exception_handler: Arc<dyn ExceptionHandler>,
    listeners: Mutex<Vec<Weak<dyn LifecycleEventListener>>>,
    state: Mutex<LifecycleState>,
}

impl ReactContext {
    /// Creates a context that queues work on `js_queue` and logs fatal errors.
    pub fn new(js_queue: Arc<dyn JsExecutor>) -> Self {
        Self {
            js_queue,
            emitter: RwLock::new(None),
            exception_handler: Arc::new(LoggingExceptionHandler),
            listeners: Mutex::new(Vec::new()),
            state: Mutex::new(LifecycleState::BeforeResume),
        }
    }

    pub fn with_exception_handler(mut self, handler: Arc<dyn ExceptionHandler>) -> Self {
        self.exception_handler = handler;
        self
    }

    /// Binds the JS event emitter module once the JS side has loaded it.
    pub fn bind_event_emitter(&self, emitter: Arc<dyn JsEventEmitter>) {
        *write(&self.emitter) = Some(emitter);
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        *lock(&self.state)
    }

    /// Number of registered listeners that are still alive.
    pub fn lifecycle_listener_count(&self) -> usize {
        lock(&self.listeners).iter().filter(|l| l.strong_count() > 0).count()
    }

    pub fn on_host_resume(&self) {
        info!("▶️ Host resumed");
        self.broadcast(LifecycleState::Resumed, |l| l.on_resume());
    }

    pub fn on_host_suspend(&self) {
        info!("⏸️ Host suspended");
        self.broadcast(LifecycleState::Suspended, |l| l.on_suspend());
    }

    pub fn on_host_destroy(&self) {
        info!("🛑 Host destroyed");
        self.broadcast(LifecycleState::Destroyed, |l| l.on_destroy());
    }

    /// Notifies listeners that the React instance is going away.
    pub fn dispose(&self) {
        info!("🧹 React instance disposing");
        self.broadcast(LifecycleState::Disposed, |l| l.on_react_instance_dispose());
    }

    /// Records `state` and notifies every live listener. A panicking listener
    /// is reported to the exception handler; the rest are still notified.
    fn broadcast(&self, state: LifecycleState, notify: impl Fn(&dyn LifecycleEventListener)) {
        *lock(&self.state) = state;

        // Upgrade first so listeners run without the registry lock held.
        let live: Vec<Arc<dyn LifecycleEventListener>> = {
            let mut listeners = lock(&self.listeners);
            listeners.retain(|l| l.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };

        debug!("Broadcasting {:?} to {} lifecycle listeners", state, live.len());
        for listener in live {
            // One failing listener must not keep the others from hearing about it.
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| notify(listener.as_ref()))) {
                self.handle_exception(DispatchError::LifecycleListenerPanicked {
                    phase: format!("{state:?}"),
                    message: panic_message(payload.as_ref()),
                });
            }
        }
    }
}

impl Debug for ReactContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactContext")
            .field("js_queue", &self.js_queue)
            .field("emitter_bound", &read(&self.emitter).is_some())
            .field("exception_handler", &self.exception_handler)
            .field("lifecycle_state", &self.lifecycle_state())
            .finish()
    }
}

impl HostContext for ReactContext {
    fn run_on_js_queue(&self, task: JsTask) {
        self.js_queue.run_on_js_queue(task);
    }

    fn event_emitter(&self) -> Option<Arc<dyn JsEventEmitter>> {
        read(&self.emitter).clone()
    }

    fn handle_exception(&self, error: DispatchError) {
        self.exception_handler.handle_exception(error);
    }

    fn add_lifecycle_event_listener(&self, listener: Weak<dyn LifecycleEventListener>) {
        lock(&self.listeners).push(listener);
    }
}
