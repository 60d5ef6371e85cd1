//! Process-wide ordering state for events.
//!
//! Timestamps are measured from a monotonic epoch captured the first time any
//! event is stamped. Sorting keys come from a single atomic counter that starts
//! at 0 when the process starts, so two events created in sequence always
//! compare in creation order even when their timestamps collide.

use super::Event;
use once_cell::sync::Lazy;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);
static NEXT_SORTING_KEY: AtomicU64 = AtomicU64::new(0);

/// Time elapsed since the process-wide event epoch.
pub fn monotonic_now() -> Duration {
    EPOCH.elapsed()
}

/// Takes the next value of the process-wide sorting key counter.
pub fn next_sorting_key() -> u64 {
    NEXT_SORTING_KEY.fetch_add(1, Ordering::Relaxed)
}

/// Total order used to sort a dispatch batch: `(timestamp, sorting_key)`
/// ascending, with empty slots first.
pub fn event_order(a: &Option<Box<dyn Event>>, b: &Option<Box<dyn Event>>) -> CmpOrdering {
    match (a, b) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        (Some(a), Some(b)) => a
            .timestamp()
            .cmp(&b.timestamp())
            .then_with(|| a.sorting_key().cmp(&b.sorting_key())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorting_keys_strictly_increase() {
        let first = next_sorting_key();
        let second = next_sorting_key();
        assert!(second > first);
    }

    #[test]
    fn test_sorting_keys_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..1000).map(|_| next_sorting_key()).collect::<Vec<_>>()))
            .collect();

        let mut all: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_monotonic_clock_never_goes_backwards() {
        let a = monotonic_now();
        let b = monotonic_now();
        assert!(b >= a);
    }
}
