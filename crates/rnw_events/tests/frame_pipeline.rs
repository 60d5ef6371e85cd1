//! End-to-end: real frame loop thread, real JS queue thread, many producers.

use rnw_events::{
    Choreographer, DispatchError, EventDispatcher, ExceptionHandler, JsEventEmitter, JsQueueThread, KeyEvent,
    ReactContext, TouchEvent, TouchEventType,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
struct Received {
    name: String,
    producer: u64,
    seq: u64,
    thread: thread::ThreadId,
}

#[derive(Debug, Default)]
struct CollectingEmitter {
    received: Mutex<Vec<Received>>,
    /// Key code whose delivery panics
    fail_on_key: Option<u64>,
}

impl CollectingEmitter {
    fn record(&self, name: &str, producer: u64, seq: u64) {
        self.received.lock().unwrap().push(Received {
            name: name.to_string(),
            producer,
            seq,
            thread: thread::current().id(),
        });
    }

    fn of(&self, name: &str) -> Vec<Received> {
        self.received.lock().unwrap().iter().filter(|r| r.name == name).cloned().collect()
    }
}

impl JsEventEmitter for CollectingEmitter {
    fn receive_event(&self, view_tag: i32, event_name: &str, payload: Value) {
        let key = payload["key"].as_u64().unwrap_or_default();
        if self.fail_on_key == Some(key) {
            panic!("emitter rejected key {key}");
        }
        self.record(event_name, view_tag as u64, key);
    }

    fn receive_touches(&self, event_name: &str, touches: Vec<Value>, _changed_indices: Vec<usize>) {
        let touch = &touches[0];
        self.record(
            event_name,
            touch["identifier"].as_u64().unwrap_or_default(),
            touch["seq"].as_u64().unwrap_or_default(),
        );
    }
}

#[derive(Debug, Default)]
struct PanickingHandler;

impl ExceptionHandler for PanickingHandler {
    fn handle_exception(&self, error: DispatchError) {
        panic!("unexpected dispatch error: {error}");
    }
}

#[derive(Debug, Default)]
struct RecordingHandler {
    errors: Mutex<Vec<DispatchError>>,
}

impl ExceptionHandler for RecordingHandler {
    fn handle_exception(&self, error: DispatchError) {
        self.errors.lock().unwrap().push(error);
    }
}

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    done()
}

#[test]
fn test_concurrent_producers_flush_on_the_js_thread() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let js_queue = Arc::new(JsQueueThread::spawn("js-queue").unwrap());
    let js_thread = js_queue.thread_id();
    let context = Arc::new(ReactContext::new(js_queue.clone()).with_exception_handler(Arc::new(PanickingHandler)));
    let emitter = Arc::new(CollectingEmitter::default());
    context.bind_event_emitter(emitter.clone());

    let choreographer = Arc::new(Choreographer::new());
    let dispatcher = EventDispatcher::new(context.clone(), choreographer.clone());
    context.on_host_resume();
    let mut frame_loop = choreographer.spawn_frame_loop(Duration::from_millis(1)).unwrap();

    const PRODUCERS: u32 = 4;
    const KEYS_PER_PRODUCER: u64 = 50;

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                for seq in 0..KEYS_PER_PRODUCER {
                    dispatcher.dispatch_event(Box::new(KeyEvent::key_down(producer as i32, seq as i32)));
                    dispatcher.dispatch_event(Box::new(TouchEvent::new(
                        TouchEventType::Move,
                        vec![json!({ "identifier": producer, "seq": seq })],
                        vec![0],
                        producer,
                    )));
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let expected_keys = (PRODUCERS as usize) * KEYS_PER_PRODUCER as usize;
    let settled = wait_until(Duration::from_secs(10), || {
        let stats = dispatcher.stats();
        stats.events_dispatched + stats.events_coalesced == stats.events_received
    });
    assert!(settled);
    frame_loop.stop();
    context.on_host_destroy();

    let keys = emitter.of("topKeyDown");
    let moves = emitter.of("topTouchMove");
    assert_eq!(keys.len(), expected_keys);
    assert!(keys.iter().chain(moves.iter()).all(|r| r.thread == js_thread));

    for producer in 0..PRODUCERS as u64 {
        // One producer's events keep their creation order across cycles.
        let seqs: Vec<u64> = keys.iter().filter(|r| r.producer == producer).map(|r| r.seq).collect();
        assert_eq!(seqs, (0..KEYS_PER_PRODUCER).collect::<Vec<_>>());

        // Moves coalesce, but the final position always arrives.
        let move_seqs: Vec<u64> = moves.iter().filter(|r| r.producer == producer).map(|r| r.seq).collect();
        assert!(!move_seqs.is_empty());
        assert!(move_seqs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(move_seqs.last(), Some(&(KEYS_PER_PRODUCER - 1)));
    }

    let stats = dispatcher.stats();
    assert_eq!(stats.events_received, 2 * expected_keys as u64);
    assert!(stats.flushes >= 1);
}

#[test]
fn test_delivery_resumes_after_a_panicking_flush() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let js_queue = Arc::new(JsQueueThread::spawn("js-queue-faulty").unwrap());
    let handler = Arc::new(RecordingHandler::default());
    let context = Arc::new(ReactContext::new(js_queue).with_exception_handler(handler.clone()));
    let emitter = Arc::new(CollectingEmitter {
        fail_on_key: Some(999),
        ..Default::default()
    });
    context.bind_event_emitter(emitter.clone());

    let choreographer = Arc::new(Choreographer::new());
    let dispatcher = EventDispatcher::new(context.clone(), choreographer.clone());
    context.on_host_resume();
    let mut frame_loop = choreographer.spawn_frame_loop(Duration::from_millis(1)).unwrap();

    dispatcher.dispatch_event(Box::new(KeyEvent::key_down(1, 999)));
    assert!(wait_until(Duration::from_secs(5), || dispatcher.stats().events_failed == 1));

    for key in 0..10 {
        dispatcher.dispatch_event(Box::new(KeyEvent::key_down(1, key)));
    }
    let delivered = wait_until(Duration::from_secs(5), || emitter.of("topKeyDown").len() == 10);
    frame_loop.stop();
    context.on_host_destroy();

    assert!(delivered);
    let keys: Vec<u64> = emitter.of("topKeyDown").iter().map(|r| r.seq).collect();
    assert_eq!(keys, (0..10).collect::<Vec<_>>());
    assert!(!dispatcher.has_dispatch_scheduled());
    assert!(matches!(
        handler.errors.lock().unwrap().as_slice(),
        [DispatchError::EventDispatchPanicked { event_name, .. }] if event_name == "topKeyDown"
    ));
}
