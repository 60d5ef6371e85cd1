//! Synthetic native input.
//!
//! Two producer threads stand in for the platform's input callbacks. The touch
//! producer drags every simulated pointer across its own view, emitting several
//! moves per frame. The keyboard producer focuses a view, types into it at a
//! fixed rate while scrolling it, and blurs it on shutdown.

use crate::config::SimulationSettings;
use rnw_events::{
    BlurEvent, EventDispatcher, FocusEvent, KeyEvent, PointerEnterExitEvent, ReactPointer, ScrollEvent, ScrollEventType,
    TouchEvent, TouchEventType,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Running producer threads. Stops them when dropped.
pub struct Simulation {
    running: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl Simulation {
    /// Spawns the producers. Touch moves are paced by `frame_interval`.
    pub fn start(
        dispatcher: Arc<EventDispatcher>,
        settings: &SimulationSettings,
        frame_interval: Duration,
    ) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let mut handles = Vec::new();

        if settings.pointers > 0 {
            let producer = TouchProducer::new(dispatcher.clone(), settings);
            let running = running.clone();
            handles.push(
                thread::Builder::new()
                    .name("touch-producer".to_string())
                    .spawn(move || producer.run(&running, frame_interval))?,
            );
        }

        if settings.key_events_per_second > 0 {
            let view_tag = settings.view_tag_base;
            let period = Duration::from_secs_f64(1.0 / f64::from(settings.key_events_per_second));
            let running = running.clone();
            handles.push(
                thread::Builder::new()
                    .name("key-producer".to_string())
                    .spawn(move || run_keyboard(&dispatcher, &running, view_tag, period))?,
            );
        }

        info!("🧵 Started {} input producer(s)", handles.len());
        Ok(Self { running, handles })
    }

    /// Signals the producers and waits for them to finish their last events.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                error!("❌ Input producer thread panicked");
            }
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

struct TouchProducer {
    dispatcher: Arc<EventDispatcher>,
    pointers: Vec<ReactPointer>,
    moves_per_frame: u32,
    started: Instant,
}

impl TouchProducer {
    fn new(dispatcher: Arc<EventDispatcher>, settings: &SimulationSettings) -> Self {
        let pointers = (0..settings.pointers)
            .map(|id| ReactPointer {
                target: settings.view_tag_base.saturating_add(id as i32),
                pointer_id: id,
                identifier: id,
                pointer_type: "touch".to_string(),
                force: 0.5,
                location_y: 10.0 * id as f32,
                page_y: 10.0 * id as f32,
                ..Default::default()
            })
            .collect();

        Self {
            dispatcher,
            pointers,
            moves_per_frame: settings.moves_per_frame,
            started: Instant::now(),
        }
    }

    fn run(mut self, running: &AtomicBool, frame_interval: Duration) {
        self.hover(TouchEventType::Entered);
        self.emit_all(TouchEventType::Start);

        while running.load(Ordering::Acquire) {
            for _ in 0..self.moves_per_frame {
                for index in 0..self.pointers.len() {
                    let pointer = &mut self.pointers[index];
                    pointer.location_x += 1.0;
                    pointer.page_x += 1.0;
                    self.emit(TouchEventType::Move, index);
                }
            }
            thread::sleep(frame_interval);
        }

        self.emit_all(TouchEventType::End);
        self.hover(TouchEventType::Exited);
    }

    fn emit_all(&mut self, kind: TouchEventType) {
        for index in 0..self.pointers.len() {
            self.emit(kind, index);
        }
    }

    fn emit(&mut self, kind: TouchEventType, index: usize) {
        let now = self.started.elapsed().as_millis() as u64;
        for pointer in &mut self.pointers {
            pointer.timestamp = now;
        }

        match TouchEvent::from_pointers(kind, &self.pointers, index) {
            Some(Ok(event)) => self.dispatcher.dispatch_event(Box::new(event)),
            Some(Err(e)) => warn!("🟡 Could not serialize pointers for {:?}: {}", kind, e),
            None => {}
        }
    }

    /// Mouse-style enter/exit for the first pointer's view.
    fn hover(&self, kind: TouchEventType) {
        if let Some(pointer) = self.pointers.first() {
            self.dispatcher.dispatch_event(Box::new(PointerEnterExitEvent::new(
                kind,
                pointer.target,
                pointer.clone(),
                true,
                true,
            )));
        }
    }
}

fn run_keyboard(dispatcher: &EventDispatcher, running: &AtomicBool, view_tag: i32, period: Duration) {
    dispatcher.dispatch_event(Box::new(FocusEvent::new(view_tag)));

    let mut offset = 0.0f64;
    let mut key = b'A';
    while running.load(Ordering::Acquire) {
        dispatcher.dispatch_event(Box::new(KeyEvent::key_down(view_tag, i32::from(key))));
        dispatcher.dispatch_event(Box::new(KeyEvent::key_up(view_tag, i32::from(key))));
        key = if key == b'Z' { b'A' } else { key + 1 };

        for _ in 0..3 {
            offset += 4.0;
            dispatcher.dispatch_event(Box::new(ScrollEvent::new(
                view_tag,
                ScrollEventType::Scroll,
                json!({ "contentOffset": { "x": 0.0, "y": offset } }),
            )));
        }
        thread::sleep(period);
    }

    dispatcher.dispatch_event(Box::new(BlurEvent::new(view_tag)));
}
