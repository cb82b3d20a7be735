//! Coarse Clock Module
//!
//! A shared coarse-grained tick counter used for byte-seconds accounting.
//! A background task bumps it roughly once per second; the stats engine only
//! ever reads it. Keeping the tick explicit (rather than sampling the system
//! clock inside the engine) makes time-integral tests fully scriptable.

use std::sync::atomic::{AtomicU64, Ordering};

// == Coarse Clock ==
/// Monotonic coarse time source, in whole ticks (seconds in production).
#[derive(Debug, Default)]
pub struct CoarseClock {
    /// Current tick count since process start
    ticks: AtomicU64,
}

impl CoarseClock {
    // == Constructor ==
    /// Creates a new clock starting at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Now ==
    /// Returns the current tick.
    pub fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    // == Set ==
    /// Sets the current tick. Called by the background tick task, and by
    /// tests that script exact timelines.
    pub fn set(&self, ticks: u64) {
        self.ticks.store(ticks, Ordering::Relaxed);
    }

    // == Advance ==
    /// Moves the clock forward by `ticks` and returns the new value.
    pub fn advance(&self, ticks: u64) -> u64 {
        self.ticks.fetch_add(ticks, Ordering::Relaxed) + ticks
    }
}
