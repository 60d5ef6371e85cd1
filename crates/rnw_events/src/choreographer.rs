//! Per-frame callback source.
//!
//! Stands in for the UI composition frame clock. Interested parties activate a
//! named callback key while they have work pending; every frame, while at
//! least one key is active, all subscribers are notified on the frame thread.

use crate::utils::lock;
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{debug, error, info};

/// Callback invoked once per frame while any key is active.
pub type FrameCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Handle returned by [`FrameCallbackSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The outbound contract the dispatcher needs from a frame clock.
pub trait FrameCallbackSource: Send + Sync + Debug {
    /// Marks `name` as needing frames. Activating an active key is a no-op.
    fn activate_callback(&self, name: &str);

    /// Clears `name`. Deactivating an inactive key is a no-op.
    fn deactivate_callback(&self, name: &str);

    fn subscribe(&self, callback: FrameCallback) -> SubscriptionId;

    /// Returns false if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Whether the caller is running on the frame thread.
    fn is_frame_thread(&self) -> bool;

    /// The frame thread, once known.
    fn frame_thread(&self) -> Option<ThreadId>;
}

/// The shipped frame source.
///
/// The frame thread is fixed by [`Choreographer::bind_to_current_thread`] or,
/// failing that, by the first thread that calls [`Choreographer::tick`].
#[derive(Default)]
pub struct Choreographer {
    active: Mutex<HashSet<String>>,
    subscribers: Mutex<Vec<(SubscriptionId, FrameCallback)>>,
    next_subscription: AtomicU64,
    frame_thread: Mutex<Option<ThreadId>>,
    frames: AtomicU64,
}

impl Choreographer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the calling thread the frame thread.
    pub fn bind_to_current_thread(&self) {
        *lock(&self.frame_thread) = Some(thread::current().id());
    }

    pub fn is_active(&self, name: &str) -> bool {
        lock(&self.active).contains(name)
    }

    pub fn has_active_callbacks(&self) -> bool {
        !lock(&self.active).is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    /// Total frames that fired callbacks.
    pub fn frames_fired(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Runs one frame. Returns true if subscribers were notified.
    ///
    /// Subscribers are called with no internal lock held so they may activate
    /// or deactivate keys and (un)subscribe from inside the callback.
    pub fn tick(&self) -> bool {
        lock(&self.frame_thread).get_or_insert_with(|| thread::current().id());

        if !self.has_active_callbacks() {
            return false;
        }

        let subscribers: Vec<FrameCallback> = lock(&self.subscribers).iter().map(|(_, cb)| cb.clone()).collect();
        for callback in subscribers {
            callback();
        }

        self.frames.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Drives [`tick`](Self::tick) every `interval` on a dedicated thread,
    /// which becomes the frame thread.
    pub fn spawn_frame_loop(self: &Arc<Self>, interval: Duration) -> std::io::Result<FrameLoop> {
        let choreographer = self.clone();
        let running = Arc::new(AtomicBool::new(true));
        let still_running = running.clone();

        let handle = thread::Builder::new().name("frame-loop".to_string()).spawn(move || {
            choreographer.bind_to_current_thread();
            while still_running.load(Ordering::Acquire) {
                choreographer.tick();
                thread::sleep(interval);
            }
            debug!("Frame loop exiting after {} frames", choreographer.frames_fired());
        })?;

        info!("🎞️ Frame loop started at {:?} per frame", interval);
        Ok(FrameLoop {
            running,
            handle: Some(handle),
        })
    }
}

impl Debug for Choreographer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Choreographer")
            .field("active", &*lock(&self.active))
            .field("subscribers", &self.subscriber_count())
            .field("frame_thread", &*lock(&self.frame_thread))
            .finish()
    }
}

impl FrameCallbackSource for Choreographer {
    fn activate_callback(&self, name: &str) {
        let mut active = lock(&self.active);
        if !active.contains(name) {
            active.insert(name.to_string());
        }
    }

    fn deactivate_callback(&self, name: &str) {
        lock(&self.active).remove(name);
    }

    fn subscribe(&self, callback: FrameCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock(&self.subscribers).push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    fn is_frame_thread(&self) -> bool {
        self.frame_thread() == Some(thread::current().id())
    }

    fn frame_thread(&self) -> Option<ThreadId> {
        *lock(&self.frame_thread)
    }
}

/// Handle to a running frame loop; stops the loop when dropped.
#[derive(Debug)]
pub struct FrameLoop {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameLoop {
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("❌ Frame loop thread panicked");
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
