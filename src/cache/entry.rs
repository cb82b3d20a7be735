//! Cache Entry Module
//!
//! A single stored value plus the expiry metadata the store needs.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// One stored value with optional expiration.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds); None never expires
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry whose TTL, if given, starts counting now.
    pub fn new(value: String, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds.map(|ttl| current_timestamp_ms() + ttl * 1000);
        Self { value, expires_at }
    }

    // == Size ==
    /// Byte size this entry contributes to prefix byte accounting.
    pub fn size_bytes(&self) -> u64 {
        self.value.len() as u64
    }

    // == Is Expired ==
    /// True once the current time has reached the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
