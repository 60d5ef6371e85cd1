use super::{Event, EventCore, ReactPointer, NO_VIEW_TAG};
use crate::emitter::JsEventEmitter;
use serde_json::Value;

/// Pointer phases reported by the touch handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchEventType {
    Start,
    End,
    Move,
    Cancel,
    Entered,
    Exited,
    PointerMove,
}

impl TouchEventType {
    pub fn js_event_name(self) -> &'static str {
        match self {
            TouchEventType::Start => "topTouchStart",
            TouchEventType::End => "topTouchEnd",
            TouchEventType::Move => "topTouchMove",
            TouchEventType::Cancel => "topTouchCancel",
            TouchEventType::Entered => "topMouseOver",
            TouchEventType::Exited => "topMouseOut",
            TouchEventType::PointerMove => "topMouseMove",
        }
    }
}

/// A multi-touch batch: every active pointer plus the indices that changed.
///
/// Touch events are root-scoped (view tag `-1`); moves of the same pointer
/// share a coalescing key so only the latest position per frame reaches JS.
#[derive(Debug, Clone)]
pub struct TouchEvent {
    core: EventCore,
    kind: TouchEventType,
    touches: Vec<Value>,
    changed_indices: Vec<usize>,
    pointer_id: u32,
}

impl TouchEvent {
    pub fn new(kind: TouchEventType, touches: Vec<Value>, changed_indices: Vec<usize>, pointer_id: u32) -> Self {
        Self {
            core: EventCore::new(NO_VIEW_TAG),
            kind,
            touches,
            changed_indices,
            pointer_id,
        }
    }

    /// Builds a batch from the active pointers; the pointer at `changed_index`
    /// is the one that triggered the event and supplies the coalescing key.
    ///
    /// Returns `None` when `changed_index` is out of range.
    pub fn from_pointers(
        kind: TouchEventType,
        pointers: &[ReactPointer],
        changed_index: usize,
    ) -> Option<Result<Self, serde_json::Error>> {
        let pointer_id = pointers.get(changed_index)?.pointer_id;
        let touches = pointers
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>();

        Some(touches.map(|touches| Self::new(kind, touches, vec![changed_index], pointer_id)))
    }

    pub fn kind(&self) -> TouchEventType {
        self.kind
    }

    pub fn touches(&self) -> &[Value] {
        &self.touches
    }

    pub fn changed_indices(&self) -> &[usize] {
        &self.changed_indices
    }
}

impl Event for TouchEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn event_name(&self) -> &str {
        self.kind.js_event_name()
    }

    fn can_coalesce(&self) -> bool {
        matches!(self.kind, TouchEventType::Move | TouchEventType::PointerMove)
    }

    fn coalescing_key(&self) -> u16 {
        // Pointer ids are truncated to the cookie's 16-bit key space.
        self.pointer_id as u16
    }

    fn dispatch(&self, emitter: &dyn JsEventEmitter) {
        emitter.receive_touches(self.event_name(), self.touches.clone(), self.changed_indices.clone());
    }
}
