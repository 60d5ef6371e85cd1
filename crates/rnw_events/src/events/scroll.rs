use super::{Event, EventCore};
use crate::emitter::JsEventEmitter;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollEventType {
    BeginDrag,
    EndDrag,
    Scroll,
    MomentumBegin,
    MomentumEnd,
}

impl ScrollEventType {
    pub fn js_event_name(self) -> &'static str {
        match self {
            ScrollEventType::BeginDrag => "topScrollBeginDrag",
            ScrollEventType::EndDrag => "topScrollEndDrag",
            ScrollEventType::Scroll => "topScroll",
            ScrollEventType::MomentumBegin => "topMomentumScrollBegin",
            ScrollEventType::MomentumEnd => "topMomentumScrollEnd",
        }
    }
}

/// Scroll view notification. Uses the default coalescing policy, so a burst
/// of `topScroll` events for one view collapses to the newest offset.
#[derive(Debug, Clone)]
pub struct ScrollEvent {
    core: EventCore,
    kind: ScrollEventType,
    data: Value,
}

impl ScrollEvent {
    pub fn new(view_tag: i32, kind: ScrollEventType, data: Value) -> Self {
        Self {
            core: EventCore::new(view_tag),
            kind,
            data,
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl Event for ScrollEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn event_name(&self) -> &str {
        self.kind.js_event_name()
    }

    fn dispatch(&self, emitter: &dyn JsEventEmitter) {
        emitter.receive_event(self.view_tag(), self.event_name(), self.data.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Coalesced;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_newer_scroll_supersedes_older() {
        let older = ScrollEvent::new(4, ScrollEventType::Scroll, json!({ "y": 10 }));
        let newer = ScrollEvent::new(4, ScrollEventType::Scroll, json!({ "y": 20 }));

        assert!(newer.can_coalesce());
        assert!(matches!(newer.coalesce(&older), Coalesced::TakeIncoming));
    }

    #[test]
    fn test_stale_scroll_is_dropped() {
        let mut stale = ScrollEvent::new(4, ScrollEventType::Scroll, json!({ "y": 10 }));
        let mut fresh = ScrollEvent::new(4, ScrollEventType::Scroll, json!({ "y": 20 }));
        stale.core = EventCore::with_timestamp(4, Duration::from_millis(1));
        fresh.core = EventCore::with_timestamp(4, Duration::from_millis(2));

        assert!(matches!(stale.coalesce(&fresh), Coalesced::KeepExisting));
    }
}
