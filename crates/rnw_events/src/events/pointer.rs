use super::{Event, EventCore, TouchEventType};
use crate::emitter::JsEventEmitter;
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Snapshot of one active pointer as serialized into touch payloads.
///
/// The native pointer id is kept for coalescing but never sent to JavaScript;
/// `identifier` is the JS-facing touch identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactPointer {
    pub target: i32,
    #[serde(skip)]
    pub pointer_id: u32,
    pub identifier: u32,
    /// Milliseconds, as reported by the native pointer point.
    pub timestamp: u64,
    pub location_x: f32,
    pub location_y: f32,
    pub page_x: f32,
    pub page_y: f32,
    pub pointer_type: String,
    pub force: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_left_button: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_right_button: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_middle_button: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_barrel_button_pressed: bool,
    #[serde(default, rename = "isHorizontalScrollWheel", skip_serializing_if = "is_false")]
    pub is_horizontal_mouse_wheel: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_eraser: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub shift_key: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub alt_key: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ctrl_key: bool,
}

/// Mouse enter/exit notification for a single view.
///
/// `send_direct` emits the non-bubbling `topMouseEnter` / `topMouseLeave`;
/// `send_bubbled` emits the bubbling over/out name. Either, both or neither
/// may be set by the producer depending on which handlers the view tree has.
#[derive(Debug, Clone)]
pub struct PointerEnterExitEvent {
    core: EventCore,
    kind: TouchEventType,
    pointer: ReactPointer,
    send_direct: bool,
    send_bubbled: bool,
}

impl PointerEnterExitEvent {
    pub fn new(
        kind: TouchEventType,
        view_tag: i32,
        pointer: ReactPointer,
        send_direct: bool,
        send_bubbled: bool,
    ) -> Self {
        Self {
            core: EventCore::new(view_tag),
            kind,
            pointer,
            send_direct,
            send_bubbled,
        }
    }

    fn direct_event_name(&self) -> Option<&'static str> {
        match self.kind {
            TouchEventType::Entered => Some("topMouseEnter"),
            TouchEventType::Exited => Some("topMouseLeave"),
            _ => None,
        }
    }
}

impl Event for PointerEnterExitEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn event_name(&self) -> &str {
        self.kind.js_event_name()
    }

    fn can_coalesce(&self) -> bool {
        false
    }

    fn dispatch(&self, emitter: &dyn JsEventEmitter) {
        let payload = match serde_json::to_value(&self.pointer) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("🟡 Dropping pointer event for view {}: {}", self.view_tag(), e);
                return;
            }
        };

        if self.send_direct {
            if let Some(name) = self.direct_event_name() {
                emitter.receive_event(self.view_tag(), name, payload.clone());
            }
        }

        if self.send_bubbled {
            emitter.receive_event(self.view_tag(), self.event_name(), payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Emitted, RecordingEmitter};
    use serde_json::json;

    fn pointer() -> ReactPointer {
        ReactPointer {
            target: 9,
            pointer_id: 41,
            identifier: 1,
            timestamp: 1200,
            location_x: 2.0,
            location_y: 3.0,
            page_x: 20.0,
            page_y: 30.0,
            pointer_type: "mouse".to_string(),
            force: 0.5,
            is_left_button: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_pointer_serializes_camel_case_without_native_id() {
        let value = serde_json::to_value(pointer()).unwrap();
        assert_eq!(
            value,
            json!({
                "target": 9,
                "identifier": 1,
                "timestamp": 1200,
                "locationX": 2.0,
                "locationY": 3.0,
                "pageX": 20.0,
                "pageY": 30.0,
                "pointerType": "mouse",
                "force": 0.5,
                "isLeftButton": true,
            })
        );
    }

    #[test]
    fn test_entered_sends_direct_and_bubbled() {
        let emitter = RecordingEmitter::new();
        PointerEnterExitEvent::new(TouchEventType::Entered, 9, pointer(), true, true).dispatch(&emitter);

        let names: Vec<String> = emitter
            .take()
            .into_iter()
            .map(|e| match e {
                Emitted::Event { event_name, .. } => event_name,
                Emitted::Touches { .. } => panic!("pointer events never use receive_touches"),
            })
            .collect();
        assert_eq!(names, vec!["topMouseEnter", "topMouseOver"]);
    }

    #[test]
    fn test_exited_bubbled_only() {
        let emitter = RecordingEmitter::new();
        PointerEnterExitEvent::new(TouchEventType::Exited, 9, pointer(), false, true).dispatch(&emitter);

        let emitted = emitter.take();
        assert_eq!(emitted.len(), 1);
        assert!(matches!(&emitted[0], Emitted::Event { event_name, .. } if event_name == "topMouseOut"));
    }
}
