//! Event cookies: the composite keys used to find coalescing partners.
//!
//! ```text
//! VIEW_TAG_MASK       = 0x0000_0000_ffff_ffff
//! EVENT_TYPE_ID_MASK  = 0x0000_ffff_0000_0000
//! COALESCING_KEY_MASK = 0xffff_0000_0000_0000
//! ```
//!
//! Two events are coalescing partners iff they target the same view, carry the
//! same event name and share a coalescing key.

use crate::error::DispatchError;
use std::collections::HashMap;

/// Number of distinct event names the 16-bit type id space can hold.
pub const MAX_EVENT_TYPES: usize = u16::MAX as usize;

/// Packs a view tag, event type id and coalescing key into one cookie.
///
/// The view tag is masked to its low 32 bits so that negative sentinel tags
/// cannot bleed into the type id or key fields.
#[inline]
pub fn event_cookie(view_tag: i32, event_type_id: u16, coalescing_key: u16) -> u64 {
    (view_tag as u32 as u64) | ((event_type_id as u64) << 32) | ((coalescing_key as u64) << 48)
}

/// Lazily assigned dense ids for event names.
#[derive(Debug, Default)]
pub struct EventTypeRegistry {
    ids: HashMap<String, u16>,
}

impl EventTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `event_name`, assigning the next free one on first
    /// sight.
    pub fn id_for(&mut self, event_name: &str) -> Result<u16, DispatchError> {
        if let Some(id) = self.ids.get(event_name) {
            return Ok(*id);
        }

        if self.ids.len() >= MAX_EVENT_TYPES {
            return Err(DispatchError::EventTypeIdOverflow { limit: MAX_EVENT_TYPES });
        }

        let id = self.ids.len() as u16;
        self.ids.insert(event_name.to_owned(), id);
        Ok(id)
    }

    /// Looks up (or registers) the name and packs the cookie.
    pub fn cookie(&mut self, view_tag: i32, event_name: &str, coalescing_key: u16) -> Result<u64, DispatchError> {
        let event_type_id = self.id_for(event_name)?;
        Ok(event_cookie(view_tag, event_type_id, coalescing_key))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cookie_layout() {
        assert_eq!(event_cookie(5, 0, 0), 5);
        assert_eq!(event_cookie(0, 1, 0), 1 << 32);
        assert_eq!(event_cookie(0, 0, 1), 1 << 48);
        assert_eq!(event_cookie(0x1234, 0xabcd, 0x00ef), 0x00ef_abcd_0000_1234);
    }

    #[test]
    fn test_negative_view_tag_stays_in_its_field() {
        let cookie = event_cookie(-1, 2, 3);
        assert_eq!(cookie & 0xffff_ffff, 0xffff_ffff);
        assert_eq!((cookie >> 32) & 0xffff, 2);
        assert_eq!(cookie >> 48, 3);
        assert_ne!(event_cookie(-1, 2, 3), event_cookie(-1, 3, 3));
    }

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut registry = EventTypeRegistry::new();
        assert_eq!(registry.id_for("topTouchMove").unwrap(), 0);
        assert_eq!(registry.id_for("topScroll").unwrap(), 1);
        assert_eq!(registry.id_for("topTouchMove").unwrap(), 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_cookies_distinct_for_distinct_triples() {
        let mut registry = EventTypeRegistry::new();
        let names = ["topTouchMove", "topScroll", "topMouseMove"];
        let mut seen = HashSet::new();

        for tag in [-1, 0, 1, 7, i32::MAX, i32::MIN] {
            for name in names {
                for key in [0u16, 1, 7, u16::MAX] {
                    assert!(seen.insert(registry.cookie(tag, name, key).unwrap()));
                }
            }
        }
    }

    #[test]
    fn test_overflow_on_the_65536th_name() {
        let mut registry = EventTypeRegistry::new();
        for i in 0..MAX_EVENT_TYPES {
            registry.id_for(&format!("topEvent{i}")).unwrap();
        }

        // Known names keep resolving once the space is full.
        assert_eq!(registry.id_for("topEvent0").unwrap(), 0);
        assert_eq!(
            registry.id_for("topOneTooMany"),
            Err(DispatchError::EventTypeIdOverflow { limit: MAX_EVENT_TYPES })
        );
    }
}
