//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at configured intervals
//! - Coarse Clock: Advances the one-second tick the stats engine reads

mod cleanup;
mod clock;

pub use cleanup::spawn_cleanup_task;
pub use clock::spawn_clock_task;
