//! Prefix Record Module
//!
//! One aggregate record per distinct key prefix: running counters plus the
//! lazily-flushed byte-seconds time integral.

// == Prefix Record ==
/// Counters for a single key prefix.
///
/// `num_bytes` is only ever mutated by signed deltas, never assigned
/// absolutely; `total_byte_seconds` is the running integral of `num_bytes`
/// over elapsed clock ticks, flushed lazily by [`flush_byte_seconds`]
/// before any byte-total change and at report time.
///
/// [`flush_byte_seconds`]: PrefixRecord::flush_byte_seconds
#[derive(Debug, Default)]
pub struct PrefixRecord {
    /// Owned copy of the prefix bytes (empty for the wildcard record)
    prefix: Box<[u8]>,
    /// Live item count. Decremented unconditionally on removal, so an
    /// unmatched removal event wraps; a known condition, kept as-is.
    pub num_items: u32,
    /// Clock tick of the last byte-seconds flush
    pub last_update: u64,
    /// Total GET requests against this prefix
    pub num_gets: u64,
    /// GET requests that found a live item
    pub num_hits: u64,
    /// Attempted SET requests (counted pre-commit)
    pub num_sets: u64,
    /// DELETE requests
    pub num_deletes: u64,
    /// Items evicted by the replacement policy
    pub num_evicts: u64,
    /// Sets that replaced an existing item
    pub num_overwrites: u64,
    /// Items removed because their TTL elapsed
    pub num_expires: u64,
    /// Current live byte total for this prefix
    pub num_bytes: u64,
    /// Cumulative bytes transmitted on hits
    pub bytes_txed: u64,
    /// Time integral of `num_bytes` over elapsed ticks
    pub total_byte_seconds: u64,
}

impl PrefixRecord {
    // == Constructor ==
    /// Creates a zeroed record owning a copy of the given prefix bytes.
    pub fn new(prefix: &[u8]) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    // == Prefix ==
    /// The prefix bytes this record aggregates.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    // == Matches ==
    /// Exact prefix equality: length first, then bytes.
    pub fn matches(&self, prefix: &[u8]) -> bool {
        self.prefix.len() == prefix.len() && *self.prefix == *prefix
    }

    // == Byte-Seconds Flush ==
    /// Folds the elapsed interval into `total_byte_seconds`.
    ///
    /// Must run *before* any pending byte-total delta is applied, so the
    /// integral uses the byte count that was actually live during the
    /// interval. A no-op when the tick has not moved since the last flush.
    pub fn flush_byte_seconds(&mut self, now: u64) {
        if now != self.last_update {
            self.total_byte_seconds += self.num_bytes * (now - self.last_update);
            self.last_update = now;
        }
    }

    // == Apply Byte Delta ==
    /// Applies a signed change to the live byte total.
    pub fn apply_byte_delta(&mut self, delta: i64) {
        self.num_bytes = self.num_bytes.wrapping_add_signed(delta);
    }

    // == Has Traffic ==
    /// True once any get, set or delete has been recorded. Gates whether the
    /// wildcard record earns a line in the report.
    pub fn has_traffic(&self) -> bool {
        self.num_gets != 0 || self.num_sets != 0 || self.num_deletes != 0
    }

    // == Reset ==
    /// Zeroes every counter while keeping the owned prefix.
    pub fn reset(&mut self) {
        let prefix = std::mem::take(&mut self.prefix);
        *self = Self {
            prefix,
            ..Self::default()
        };
    }
}
