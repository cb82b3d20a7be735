//! Cache Store Module
//!
//! HashMap storage with LRU eviction and TTL expiration, feeding every
//! operation into the embedded prefix stats engine. The store is the
//! single owner of the engine, so whoever holds the store's lock holds the
//! stats lock; all accounting happens inside the same critical section as
//! the mutation that triggered it.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};
use crate::stats::{ByteChangeFlags, PrefixStats, RemovalCause, SizeEvent};

/// What a lookup found, captured before any mutation so borrows stay short.
enum GetOutcome {
    Hit(String),
    Expired(u64),
    Miss,
}

// == Cache Store ==
/// Main cache storage with LRU eviction, TTL support and prefix statistics.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Prefix-keyed statistics engine
    stats: PrefixStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore around an already-configured stats engine.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `default_ttl` - Default TTL in seconds for entries without explicit TTL
    /// * `stats` - Prefix stats engine; its delimiter is fixed at this point
    pub fn new(max_entries: usize, default_ttl: u64, stats: PrefixStats) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats,
            max_entries,
            default_ttl,
        }
    }

    // == Stats Access ==
    /// Read access to the stats engine.
    pub fn stats(&self) -> &PrefixStats {
        &self.stats
    }

    /// Write access to the stats engine (reports mutate flush state).
    pub fn stats_mut(&mut self) -> &mut PrefixStats {
        &mut self.stats
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// The attempted set is recorded before validation; item-count and byte
    /// accounting only happen once the entry is actually committed, since
    /// the set may still fail below.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) -> Result<()> {
        self.stats.record_set(key.as_bytes());

        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let old_size = self.entries.get(&key).map(|entry| entry.size_bytes());
        let is_overwrite = old_size.is_some();

        // If not overwriting and at capacity, evict the oldest entry first.
        if !is_overwrite && self.entries.len() >= self.max_entries {
            self.evict_one()?;
        }

        let entry = CacheEntry::new(value, Some(ttl.unwrap_or(self.default_ttl)));
        let new_size = entry.size_bytes();
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);

        let delta = new_size as i64 - old_size.unwrap_or(0) as i64;
        self.stats.record_byte_total_change(
            key.as_bytes(),
            delta,
            ByteChangeFlags {
                increment_item_count: !is_overwrite,
                is_overwrite,
            },
        );
        self.stats.record_size_event(SizeEvent::Set, new_size);
        if let Some(old_size) = old_size {
            self.stats.record_size_event(SizeEvent::Overwrite, new_size);
            self.stats.record_object_unlinked(old_size);
        }
        self.stats.record_object_linked(new_size);

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed on sight: the request counts as a miss
    /// and the removal is accounted as an expiry.
    pub fn get(&mut self, key: &str) -> Result<String> {
        let outcome = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => GetOutcome::Expired(entry.size_bytes()),
            Some(entry) => GetOutcome::Hit(entry.value.clone()),
            None => GetOutcome::Miss,
        };

        match outcome {
            GetOutcome::Hit(value) => {
                let size = value.len() as u64;
                self.stats.record_get(key.as_bytes(), true, size);
                self.stats.record_size_event(SizeEvent::Hit, size);
                self.stats.record_object_hit(size);
                self.lru.touch(key);
                Ok(value)
            }
            GetOutcome::Expired(size) => {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.record_get(key.as_bytes(), false, 0);
                self.stats
                    .record_removal(key.as_bytes(), size, RemovalCause::Expired);
                self.stats.record_size_event(SizeEvent::Expire, size);
                self.stats.record_object_unlinked(size);
                Err(CacheError::Expired(key.to_string()))
            }
            GetOutcome::Miss => {
                self.stats.record_get(key.as_bytes(), false, 0);
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key. The delete request is counted whether or
    /// not the key exists; removal accounting only happens on success.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.stats.record_delete(key.as_bytes());
        match self.entries.remove(key) {
            Some(entry) => {
                self.lru.remove(key);
                let size = entry.size_bytes();
                self.stats
                    .record_removal(key.as_bytes(), size, RemovalCause::Deleted);
                self.stats.record_size_event(SizeEvent::Delete, size);
                self.stats.record_object_unlinked(size);
                Ok(())
            }
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Eviction ==
    /// Evicts the least recently used entry, accounting it as an eviction
    /// against its prefix.
    fn evict_one(&mut self) -> Result<()> {
        let victim = self.lru.evict_oldest().ok_or_else(|| {
            CacheError::CacheFull("Cache is full and eviction failed".to_string())
        })?;
        if let Some(entry) = self.entries.remove(&victim) {
            let size = entry.size_bytes();
            self.stats
                .record_removal(victim.as_bytes(), size, RemovalCause::Evicted);
            self.stats.record_size_event(SizeEvent::Evict, size);
            self.stats.record_object_unlinked(size);
            debug!("Evicted '{}' ({} bytes)", victim, size);
        }
        Ok(())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, accounting each as an expiry.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<(String, u64)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, entry)| (key.clone(), entry.size_bytes()))
            .collect();

        for (key, size) in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats
                .record_removal(key.as_bytes(), *size, RemovalCause::Expired);
            self.stats.record_size_event(SizeEvent::Expire, *size);
            self.stats.record_object_unlinked(*size);
        }

        expired.len()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
