//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.
//! Each removal is accounted to the owning prefix as an expiry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between cleanup runs. It acquires a write lock on the cache store to
/// remove expired entries; the store records each removal against the
/// entry's prefix with expiry cause.
///
/// # Arguments
/// * `cache` - Arc<RwLock<CacheStore>> shared reference to the cache
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
