//! Cache Module
//!
//! The key/value store surrounding the prefix stats engine: TTL expiration,
//! LRU eviction, and byte accounting. Every operation reports itself to the
//! embedded stats engine under the store's own lock.

mod entry;
mod lru;
mod store;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
