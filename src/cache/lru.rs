//! LRU Tracker Module
//!
//! Access-order tracking for eviction, based on a monotonically increasing
//! sequence stamp per key. Touches are O(1); picking a victim scans all
//! stamps, which is acceptable because evictions are rare next to touches.

use std::collections::HashMap;

// == LRU Tracker ==
/// Tracks which key was used least recently.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Last-use stamp per key
    stamps: HashMap<String, u64>,
    /// Next stamp to hand out
    next_seq: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as just used.
    pub fn touch(&mut self, key: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.stamps.insert(key.to_string(), seq);
    }

    // == Remove ==
    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        self.stamps.remove(key);
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key, or None when empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let victim = self
            .stamps
            .iter()
            .min_by_key(|(_, &seq)| seq)
            .map(|(key, _)| key.clone())?;
        self.stamps.remove(&victim);
        Some(victim)
    }

    // == Length ==
    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }
}
