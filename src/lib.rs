//! Prefix Cache - An in-memory cache server with per-prefix statistics
//!
//! Cache keys are split on a configurable delimiter byte; everything up to
//! and including the first delimiter is the key's prefix, and the server
//! keeps per-prefix counters (hits, misses, bytes, evictions, byte-second
//! occupancy integrals) alongside the cache itself. Keys without a
//! delimiter are grouped under a single wildcard record.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod stats;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use stats::{CoarseClock, PrefixStats};
pub use tasks::{spawn_cleanup_task, spawn_clock_task};
