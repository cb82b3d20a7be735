//! Prefix Table Module
//!
//! Fixed-bucket-count hash table of prefix records. The bucket count never
//! changes; long collision chains degrade lookup cost, never correctness.
//! Records live until a full clear — there is no per-record expiry.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use crate::stats::{PrefixRecord, PREFIX_HASH_SIZE};

// == Prefix Extraction ==
/// Returns the span of `key` up to (excluding) the first `delimiter` byte,
/// or the whole key when no delimiter is present. Pure; callers route
/// full-length spans to the wildcard record instead of the table.
pub fn prefix_span(key: &[u8], delimiter: u8) -> &[u8] {
    match key.iter().position(|&b| b == delimiter) {
        Some(idx) => &key[..idx],
        None => key,
    }
}

// == Prefix Table ==
/// Hash table of [`PrefixRecord`]s, partitioned into a fixed number of
/// buckets by a hash of the prefix bytes.
///
/// Within a bucket, records are kept in insertion order and iterated
/// newest-first, so report order is deterministic for a given insertion
/// history (it is an artifact of the hash function, not a contract).
#[derive(Debug)]
pub struct PrefixTable {
    /// Collision chains, one per hash bucket
    buckets: [Vec<PrefixRecord>; PREFIX_HASH_SIZE],
    /// Number of records across all buckets
    num_prefixes: usize,
    /// Sum of all stored prefix lengths, used for report buffer sizing
    total_prefix_len: usize,
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTable {
    // == Constructor ==
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| Vec::new()),
            num_prefixes: 0,
            total_prefix_len: 0,
        }
    }

    // == Bucket Index ==
    /// Maps prefix bytes to a bucket.
    pub fn bucket_index(prefix: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        hasher.write(prefix);
        (hasher.finish() % PREFIX_HASH_SIZE as u64) as usize
    }

    // == Find ==
    /// Non-creating lookup.
    pub fn find(&self, prefix: &[u8]) -> Option<&PrefixRecord> {
        self.buckets[Self::bucket_index(prefix)]
            .iter()
            .find(|record| record.matches(prefix))
    }

    // == Find Or Create ==
    /// Returns the record for `prefix`, registering a new zeroed one if no
    /// record exists yet. Lookup always precedes creation, so exactly one
    /// record ever exists per distinct prefix value.
    pub fn find_or_create(&mut self, prefix: &[u8]) -> &mut PrefixRecord {
        let idx = Self::bucket_index(prefix);
        let pos = self.buckets[idx]
            .iter()
            .position(|record| record.matches(prefix));

        let pos = match pos {
            Some(pos) => pos,
            None => {
                self.num_prefixes += 1;
                self.total_prefix_len += prefix.len();
                self.buckets[idx].push(PrefixRecord::new(prefix));
                self.buckets[idx].len() - 1
            }
        };

        &mut self.buckets[idx][pos]
    }

    // == Iterate ==
    /// All records: bucket index ascending, newest-inserted first within a
    /// bucket.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PrefixRecord> {
        self.buckets
            .iter_mut()
            .flat_map(|bucket| bucket.iter_mut().rev())
    }

    // == Clear ==
    /// Drops every record and resets the global counts. The only deletion
    /// path the table has.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.num_prefixes = 0;
        self.total_prefix_len = 0;
    }

    // == Counts ==
    /// Number of distinct prefixes currently tracked.
    pub fn num_prefixes(&self) -> usize {
        self.num_prefixes
    }

    /// Sum of all stored prefix lengths.
    pub fn total_prefix_len(&self) -> usize {
        self.total_prefix_len
    }
}
