use super::{Event, EventCore};
use crate::emitter::JsEventEmitter;
use serde_json::json;

/// Keyboard event raised on a focused view.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    core: EventCore,
    event_name: &'static str,
    key: i32,
}

impl KeyEvent {
    pub const KEY_DOWN: &'static str = "topKeyDown";
    pub const KEY_UP: &'static str = "topKeyUp";

    pub fn key_down(view_tag: i32, key: i32) -> Self {
        Self::new(Self::KEY_DOWN, view_tag, key)
    }

    pub fn key_up(view_tag: i32, key: i32) -> Self {
        Self::new(Self::KEY_UP, view_tag, key)
    }

    fn new(event_name: &'static str, view_tag: i32, key: i32) -> Self {
        Self {
            core: EventCore::new(view_tag),
            event_name,
            key,
        }
    }

    pub fn key(&self) -> i32 {
        self.key
    }
}

impl Event for KeyEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn event_name(&self) -> &str {
        self.event_name
    }

    fn can_coalesce(&self) -> bool {
        false
    }

    fn dispatch(&self, emitter: &dyn JsEventEmitter) {
        emitter.receive_event(
            self.view_tag(),
            self.event_name,
            json!({ "target": self.view_tag(), "key": self.key }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Emitted, RecordingEmitter};

    #[test]
    fn test_key_down_payload() {
        let emitter = RecordingEmitter::new();
        KeyEvent::key_down(5, 65).dispatch(&emitter);

        assert_eq!(
            emitter.take(),
            vec![Emitted::Event {
                view_tag: 5,
                event_name: "topKeyDown".to_string(),
                payload: json!({ "target": 5, "key": 65 }),
            }]
        );
    }

    #[test]
    fn test_key_events_never_coalesce() {
        assert!(!KeyEvent::key_up(1, 13).can_coalesce());
    }
}
