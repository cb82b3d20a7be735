//! Stats Engine Module
//!
//! The write API of the prefix statistics subsystem. Every cache operation
//! in the surrounding server funnels through here; the owning store holds
//! the single exclusive lock, so all methods take `&mut self` and stay
//! short, pure memory mutation with no blocking calls.

use std::sync::Arc;

use tracing::debug;

#[cfg(feature = "cost-benefit")]
use crate::stats::buckets::CostBenefitBuckets;
#[cfg(feature = "size-buckets")]
use crate::stats::buckets::SizeBuckets;
use crate::stats::{prefix_span, CoarseClock, PrefixRecord, PrefixTable, SizeEvent};

// == Byte Change Flags ==
/// Qualifiers for a byte-total change following a committed set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteChangeFlags {
    /// The set created a new item (item count goes up by one)
    pub increment_item_count: bool,
    /// The set replaced an existing item
    pub is_overwrite: bool,
}

// == Removal Cause ==
/// Why an item left the cache. Eviction and expiry are mutually exclusive;
/// a plain delete counts neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    Deleted,
    Evicted,
    Expired,
}

// == Prefix Stats Engine ==
/// Prefix-keyed statistics aggregation: a fixed-bucket table of per-prefix
/// records, one wildcard record for delimiter-less keys, and the optional
/// size histograms, all advanced against a shared coarse clock.
#[derive(Debug)]
pub struct PrefixStats {
    /// Byte separating the grouping prefix from the rest of the key
    delimiter: u8,
    /// Shared coarse tick source for time-integral accounting
    clock: Arc<CoarseClock>,
    /// Records for keys that contain the delimiter
    table: PrefixTable,
    /// Aggregate record for keys without a delimiter
    wildcard: PrefixRecord,
    #[cfg(feature = "size-buckets")]
    size_buckets: SizeBuckets,
    #[cfg(feature = "cost-benefit")]
    cost_benefit: CostBenefitBuckets,
}

impl PrefixStats {
    // == Constructor ==
    /// Creates an empty engine. The delimiter has no default; it must be
    /// supplied here, before any event is recorded.
    pub fn new(delimiter: u8, clock: Arc<CoarseClock>) -> Self {
        Self {
            delimiter,
            clock,
            table: PrefixTable::new(),
            wildcard: PrefixRecord::default(),
            #[cfg(feature = "size-buckets")]
            size_buckets: SizeBuckets::new(),
            #[cfg(feature = "cost-benefit")]
            cost_benefit: CostBenefitBuckets::new(),
        }
    }

    // == Record Lookup ==
    /// The record a key routes to, creating a table record on first
    /// reference. Keys without the delimiter route to the wildcard.
    fn record_for(&mut self, key: &[u8]) -> &mut PrefixRecord {
        let span = prefix_span(key, self.delimiter);
        if span.len() == key.len() {
            &mut self.wildcard
        } else {
            self.table.find_or_create(span)
        }
    }

    /// Non-creating lookup of the record a key routes to.
    pub fn lookup(&self, key: &[u8]) -> Option<&PrefixRecord> {
        let span = prefix_span(key, self.delimiter);
        if span.len() == key.len() {
            Some(&self.wildcard)
        } else {
            self.table.find(span)
        }
    }

    // == Record Get ==
    /// Counts a GET; on a hit, also the bytes transmitted to the client.
    pub fn record_get(&mut self, key: &[u8], is_hit: bool, nbytes: u64) {
        let record = self.record_for(key);
        record.num_gets += 1;
        if is_hit {
            record.num_hits += 1;
            record.bytes_txed += nbytes;
        }
    }

    // == Record Delete ==
    /// Counts a DELETE request.
    pub fn record_delete(&mut self, key: &[u8]) {
        self.record_for(key).num_deletes += 1;
    }

    // == Record Set ==
    /// Counts an attempted SET. The item count is *not* touched here: the
    /// store's set may still fail, so item accounting waits for the
    /// post-commit byte-total change.
    pub fn record_set(&mut self, key: &[u8]) {
        self.record_for(key).num_sets += 1;
    }

    // == Record Byte Total Change ==
    /// Applies the byte delta of a committed set, flushing the byte-seconds
    /// integral first so the elapsed interval is weighted by the byte count
    /// that was live during it.
    pub fn record_byte_total_change(&mut self, key: &[u8], delta: i64, flags: ByteChangeFlags) {
        let now = self.clock.now();
        let record = self.record_for(key);
        record.flush_byte_seconds(now);
        record.apply_byte_delta(delta);
        if flags.increment_item_count {
            record.num_items = record.num_items.wrapping_add(1);
        }
        if flags.is_overwrite {
            record.num_overwrites += 1;
        }
    }

    // == Record Removal ==
    /// Accounts an item leaving the cache: its bytes come off the live
    /// total (after the integral flush) and the item count drops by one.
    /// An unmatched removal wraps the item count; a known condition.
    pub fn record_removal(&mut self, key: &[u8], bytes: u64, cause: RemovalCause) {
        let now = self.clock.now();
        let record = self.record_for(key);
        match cause {
            RemovalCause::Evicted => record.num_evicts += 1,
            RemovalCause::Expired => record.num_expires += 1,
            RemovalCause::Deleted => {}
        }
        record.flush_byte_seconds(now);
        record.apply_byte_delta(-(bytes as i64));
        record.num_items = record.num_items.wrapping_sub(1);
    }

    // == Size Histogram Hooks ==
    /// Counts an event against the size histogram. A no-op when the
    /// `size-buckets` feature is off.
    pub fn record_size_event(&mut self, event: SizeEvent, size: u64) {
        #[cfg(feature = "size-buckets")]
        self.size_buckets.record(event, size);
        #[cfg(not(feature = "size-buckets"))]
        let _ = (event, size);
    }

    /// Accounts a stored object in the cost-benefit occupancy. A no-op when
    /// the `cost-benefit` feature is off.
    pub fn record_object_linked(&mut self, size: u64) {
        #[cfg(feature = "cost-benefit")]
        {
            let now = self.clock.now();
            self.cost_benefit.link(size, now);
        }
        #[cfg(not(feature = "cost-benefit"))]
        let _ = size;
    }

    /// Accounts a removed object leaving the cost-benefit occupancy.
    pub fn record_object_unlinked(&mut self, size: u64) {
        #[cfg(feature = "cost-benefit")]
        {
            let now = self.clock.now();
            self.cost_benefit.unlink(size, now);
        }
        #[cfg(not(feature = "cost-benefit"))]
        let _ = size;
    }

    /// Counts a hit served by an object of `size` for the cost-benefit
    /// report.
    pub fn record_object_hit(&mut self, size: u64) {
        #[cfg(feature = "cost-benefit")]
        self.cost_benefit.hit(size);
        #[cfg(not(feature = "cost-benefit"))]
        let _ = size;
    }

    // == Histogram Dumps ==
    /// Text report of the size histogram; bare `END\r\n` when disabled.
    pub fn dump_size_buckets(&self) -> Vec<u8> {
        #[cfg(feature = "size-buckets")]
        {
            self.size_buckets.dump()
        }
        #[cfg(not(feature = "size-buckets"))]
        {
            crate::stats::TERMINATOR.to_vec()
        }
    }

    /// Text report of the cost-benefit histogram; bare `END\r\n` when
    /// disabled. Flushes every slot's occupancy integral first.
    pub fn dump_cost_benefit(&mut self) -> Vec<u8> {
        #[cfg(feature = "cost-benefit")]
        {
            let now = self.clock.now();
            self.cost_benefit.dump(now)
        }
        #[cfg(not(feature = "cost-benefit"))]
        {
            crate::stats::TERMINATOR.to_vec()
        }
    }

    // == Clear ==
    /// Drops every record, zeroes the wildcard and histograms. The only
    /// deletion path; records are never removed individually. The caller's
    /// exclusive borrow is the lock the operation relies on.
    pub fn clear(&mut self) {
        let dropped = self.table.num_prefixes();
        self.table.clear();
        self.wildcard.reset();
        #[cfg(feature = "size-buckets")]
        self.size_buckets.clear();
        #[cfg(feature = "cost-benefit")]
        self.cost_benefit.clear();
        debug!("Prefix stats cleared: {} records dropped", dropped);
    }

    // == Accessors ==
    /// Number of distinct prefixes currently tracked (wildcard excluded).
    pub fn num_prefixes(&self) -> usize {
        self.table.num_prefixes()
    }

    /// The configured delimiter byte.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// The shared clock this engine reads.
    pub fn clock(&self) -> &Arc<CoarseClock> {
        &self.clock
    }

    pub(crate) fn parts_for_report(
        &mut self,
    ) -> (&mut PrefixTable, &mut PrefixRecord, &Arc<CoarseClock>) {
        (&mut self.table, &mut self.wildcard, &self.clock)
    }
}
