/// Statistics tracking for the event dispatcher
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Snapshot of dispatcher activity since construction
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DispatcherStats {
    /// Events handed to `dispatch_event`
    pub events_received: u64,
    /// Events folded away by coalescing (one per fold, merges included)
    pub events_coalesced: u64,
    /// Events delivered to the JS event emitter
    pub events_dispatched: u64,
    /// Events whose dispatch panicked; disposed without being delivered
    pub events_failed: u64,
    /// Frame callbacks that drained the staging list
    pub frames_drained: u64,
    /// Flushes that reached the JS event emitter
    pub flushes: u64,
    /// Largest number of events delivered by a single flush
    pub max_batch_size: usize,
    /// Current dispatch buffer capacity
    pub buffer_capacity: usize,
    /// Distinct event names seen by the coalescing path
    pub registered_event_types: usize,
}

/// Live counters behind [`DispatcherStats`], updated without taking the
/// dispatcher's locks.
#[derive(Debug, Default)]
pub(super) struct StatsCounters {
    pub events_received: AtomicU64,
    pub events_coalesced: AtomicU64,
    pub events_dispatched: AtomicU64,
    pub events_failed: AtomicU64,
    pub frames_drained: AtomicU64,
    pub flushes: AtomicU64,
    pub max_batch_size: AtomicUsize,
    pub buffer_capacity: AtomicUsize,
    pub registered_event_types: AtomicUsize,
}

impl StatsCounters {
    pub fn with_capacity(buffer_capacity: usize) -> Self {
        let counters = Self::default();
        counters.buffer_capacity.store(buffer_capacity, Ordering::Relaxed);
        counters
    }

    pub fn record_flush(&self, dispatched: usize, failed: usize) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.events_dispatched.fetch_add(dispatched as u64, Ordering::Relaxed);
        self.events_failed.fetch_add(failed as u64, Ordering::Relaxed);
        self.max_batch_size.fetch_max(dispatched, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatcherStats {
        DispatcherStats {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_coalesced: self.events_coalesced.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_failed: self.events_failed.load(Ordering::Relaxed),
            frames_drained: self.frames_drained.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            max_batch_size: self.max_batch_size.load(Ordering::Relaxed),
            buffer_capacity: self.buffer_capacity.load(Ordering::Relaxed),
            registered_event_types: self.registered_event_types.load(Ordering::Relaxed),
        }
    }
}
