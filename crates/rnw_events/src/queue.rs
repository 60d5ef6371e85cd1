//! The JavaScript execution queue.
//!
//! Flushes are scheduled as fire-and-forget tasks onto a single serial queue,
//! conceptually "the JS thread". [`JsQueueThread`] is the shipped queue: one
//! dedicated named thread fed through a crossbeam channel.

use crate::utils::panic_message;
use crossbeam::channel::{self, Sender};
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, error, info};

/// A unit of work for the JS thread.
pub type JsTask = Box<dyn FnOnce() + Send + 'static>;

/// Single-shot scheduling onto the JS execution queue.
pub trait JsExecutor: Send + Sync + Debug {
    /// Queues `task`; never blocks waiting for it to run.
    fn run_on_js_queue(&self, task: JsTask);
}

enum QueueMessage {
    Run(JsTask),
    Shutdown,
}

/// A dedicated serial queue thread.
///
/// Tasks run one at a time in submission order. A task that panics is logged
/// and the queue moves on to the next one. Shutting down (explicitly or on
/// drop) lets every task queued before the shutdown finish, then joins.
pub struct JsQueueThread {
    sender: Sender<QueueMessage>,
    thread_id: ThreadId,
    handle: Option<JoinHandle<()>>,
}

impl JsQueueThread {
    /// Spawns the queue thread under `name`.
    pub fn spawn(name: &str) -> std::io::Result<Self> {
        let (sender, receiver) = channel::unbounded::<QueueMessage>();

        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            while let Ok(message) = receiver.recv() {
                match message {
                    QueueMessage::Run(task) => {
                        // A panicking task must not take the queue down with it.
                        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                            error!("❌ JS task panicked: {}", panic_message(payload.as_ref()));
                        }
                    }
                    QueueMessage::Shutdown => break,
                }
            }
            debug!("JS queue thread exiting");
        })?;

        info!("🧵 JS queue thread '{}' started", name);
        Ok(Self {
            sender,
            thread_id: handle.thread().id(),
            handle: Some(handle),
        })
    }

    /// Returns true when called from the queue thread itself.
    pub fn is_on_queue_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Stops accepting work once the already-queued tasks have run, then joins.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        // The receiver only disappears if the thread already exited.
        let _ = self.sender.send(QueueMessage::Shutdown);
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            error!("❌ JS queue thread panicked");
        }
    }
}

impl Debug for JsQueueThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsQueueThread")
            .field("thread_id", &self.thread_id)
            .field("running", &self.handle.is_some())
            .finish()
    }
}

impl JsExecutor for JsQueueThread {
    fn run_on_js_queue(&self, task: JsTask) {
        if self.sender.send(QueueMessage::Run(task)).is_err() {
            error!("❌ JS queue thread is gone; task dropped");
        }
    }
}

impl Drop for JsQueueThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_tasks_run_in_order_on_the_queue_thread() {
        let mut queue = JsQueueThread::spawn("test-js-queue").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let queue_thread = queue.thread_id();

        for i in 0..10 {
            let seen = seen.clone();
            queue.run_on_js_queue(Box::new(move || {
                seen.lock().unwrap().push((i, thread::current().id()));
            }));
        }
        queue.shutdown();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.iter().map(|(i, _)| *i).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
        assert!(seen.iter().all(|(_, id)| *id == queue_thread));
        assert!(!queue.is_on_queue_thread());
    }

    #[test]
    fn test_panicking_task_does_not_stop_the_queue() {
        let mut queue = JsQueueThread::spawn("test-js-queue-panic").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        queue.run_on_js_queue(Box::new(|| panic!("emitter blew up")));
        for i in 0..3 {
            let seen = seen.clone();
            queue.run_on_js_queue(Box::new(move || seen.lock().unwrap().push(i)));
        }
        queue.shutdown();

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut queue = JsQueueThread::spawn("test-js-queue-shutdown").unwrap();
        queue.shutdown();
        queue.shutdown();
        // Work submitted after shutdown is dropped, not run.
        queue.run_on_js_queue(Box::new(|| panic!("must not run")));
    }
}
