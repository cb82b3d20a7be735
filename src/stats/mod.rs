//! Prefix Statistics Module
//!
//! Detailed statistics tracked per key prefix, in the style of memcached's
//! "stats detail" mode. Keys are grouped by the portion preceding a
//! configured delimiter byte; each group carries running counters plus a
//! time-weighted byte-occupancy integral, and can be dumped as a plain-text
//! report with a pre-sized, never-reallocated buffer.

mod buckets;
mod clock;
mod engine;
mod record;
mod report;
mod table;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use buckets::{BucketRange, SizeEvent, BUCKET_RANGES};
pub use clock::CoarseClock;
pub use engine::{ByteChangeFlags, PrefixStats, RemovalCause};
pub use record::PrefixRecord;
pub use table::{prefix_span, PrefixTable};

// == Public Constants ==
/// Number of hash buckets in the prefix table (fixed; the table never resizes)
pub const PREFIX_HASH_SIZE: usize = 256;

/// Trailing terminator of every text report
pub const TERMINATOR: &[u8] = b"END\r\n";

/// Label used for the aggregate record of keys without a delimiter
pub const WILDCARD_NAME: &[u8] = b"*wildcard*";
