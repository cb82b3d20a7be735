//! Coarse Clock Task
//!
//! Background task that advances the shared one-second clock the stats
//! engine reads. All byte-second and cost-benefit integrals run on this
//! tick, never on wall-clock reads in the hot path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::info;

use crate::stats::CoarseClock;

/// Spawns a background task that updates the coarse clock once per second.
///
/// The tick value is seconds since the task started. Setting it from a
/// monotonic `Instant` keeps the clock immune to wall-clock jumps.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_clock_task(clock: Arc<CoarseClock>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting coarse clock task with 1 second resolution");

        let start = Instant::now();
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // First tick fires immediately; that sets the clock to zero.
        loop {
            interval.tick().await;
            clock.set(start.elapsed().as_secs());
        }
    })
}
