use super::{Event, EventCore};
use crate::emitter::JsEventEmitter;
use serde_json::json;

/// Raised when a view gains keyboard focus.
#[derive(Debug, Clone)]
pub struct FocusEvent {
    core: EventCore,
}

impl FocusEvent {
    pub fn new(view_tag: i32) -> Self {
        Self { core: EventCore::new(view_tag) }
    }
}

impl Event for FocusEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn event_name(&self) -> &str {
        "topFocus"
    }

    fn can_coalesce(&self) -> bool {
        false
    }

    fn dispatch(&self, emitter: &dyn JsEventEmitter) {
        emitter.receive_event(self.view_tag(), self.event_name(), json!({ "target": self.view_tag() }));
    }
}

/// Raised when a view loses keyboard focus.
#[derive(Debug, Clone)]
pub struct BlurEvent {
    core: EventCore,
}

impl BlurEvent {
    pub fn new(view_tag: i32) -> Self {
        Self { core: EventCore::new(view_tag) }
    }
}

impl Event for BlurEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn event_name(&self) -> &str {
        "topBlur"
    }

    fn can_coalesce(&self) -> bool {
        false
    }

    fn dispatch(&self, emitter: &dyn JsEventEmitter) {
        emitter.receive_event(self.view_tag(), self.event_name(), json!({ "target": self.view_tag() }));
    }
}
