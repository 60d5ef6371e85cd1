//! The per-cycle dispatch buffer.
//!
//! A slot array with an occupancy count. Capacity doubles when an append finds
//! the array full and never shrinks; [`DispatchBuffer::clear`] empties every
//! occupied slot and resets the count so the next cycle starts from index 0.

use crate::events::{event_order, Event};

pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct DispatchBuffer {
    slots: Vec<Option<Box<dyn Event>>>,
    len: usize,
}

impl DispatchBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity.max(1), || None);
        Self { slots, len: 0 }
    }

    /// Appends `event` and returns the index it landed at.
    pub fn push(&mut self, event: Box<dyn Event>) -> usize {
        if self.len == self.slots.len() {
            let doubled = self.slots.len() * 2;
            self.slots.resize_with(doubled, || None);
        }

        let index = self.len;
        self.slots[index] = Some(event);
        self.len += 1;
        index
    }

    /// Empties the slot at `index`, returning its event.
    pub fn take(&mut self, index: usize) -> Option<Box<dyn Event>> {
        if index >= self.len {
            return None;
        }
        self.slots[index].take()
    }

    /// Fills a previously emptied slot within the occupied prefix.
    ///
    /// Returns the event back if `index` is outside the occupied prefix.
    pub fn put(&mut self, index: usize, event: Box<dyn Event>) -> Result<(), Box<dyn Event>> {
        if index >= self.len {
            return Err(event);
        }
        self.slots[index] = Some(event);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&dyn Event> {
        self.occupied().get(index)?.as_deref()
    }

    /// Stable sort of the occupied prefix by `(timestamp, sorting_key)`.
    pub fn sort(&mut self) {
        let len = self.len;
        self.slots[..len].sort_by(event_order);
    }

    pub fn occupied(&self) -> &[Option<Box<dyn Event>>] {
        &self.slots[..self.len]
    }

    pub fn occupied_mut(&mut self) -> &mut [Option<Box<dyn Event>>] {
        let len = self.len;
        &mut self.slots[..len]
    }

    /// Empties the occupied prefix and resets the count to zero. Capacity is
    /// kept for the next cycle.
    ///
    /// Events still present are dropped without going through
    /// [`Event::dispose`]; the flush takes every event out before clearing.
    pub fn clear(&mut self) {
        for slot in self.occupied_mut() {
            *slot = None;
        }
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl Default for DispatchBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
