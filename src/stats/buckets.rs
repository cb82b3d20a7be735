//! Size Bucket Module
//!
//! Fixed-range histograms keyed by object size: per-event counters
//! (`size-buckets` feature) and occupancy-time vs. hit accounting
//! (`cost-benefit` feature). The ranges are a data-driven table shared by
//! both; slot lookup walks a handful of ranges, so cost is constant.

use std::io::Write;

use crate::stats::TERMINATOR;

// == Range Table ==
/// One contiguous `[start, end)` band of object sizes, cut into slots of
/// `step` bytes.
#[derive(Debug, Clone, Copy)]
pub struct BucketRange {
    /// Inclusive lower bound of the band
    pub start: u64,
    /// Exclusive upper bound of the band
    pub end: u64,
    /// Slot width within the band
    pub step: u64,
}

/// Size bands covered by the histograms. Objects outside every band are not
/// counted.
pub const BUCKET_RANGES: &[BucketRange] = &[
    BucketRange { start: 0, end: 1024, step: 64 },
    BucketRange { start: 1024, end: 8192, step: 512 },
    BucketRange { start: 8192, end: 65536, step: 4096 },
    BucketRange { start: 65536, end: 1048576, step: 65536 },
];

/// Soft cap on histogram report size; output beyond it is silently dropped.
const HISTOGRAM_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Conservative upper bound on one rendered histogram line.
const HISTOGRAM_MAX_LINE: usize = 256;

/// Total number of slots across all ranges.
pub fn slot_count() -> usize {
    BUCKET_RANGES
        .iter()
        .map(|r| ((r.end - r.start) / r.step) as usize)
        .sum()
}

/// Maps an object size to its global slot index, or None when the size falls
/// outside every configured range.
pub fn slot_of(size: u64) -> Option<usize> {
    let mut base = 0usize;
    for range in BUCKET_RANGES {
        if size >= range.start && size < range.end {
            return Some(base + ((size - range.start) / range.step) as usize);
        }
        base += ((range.end - range.start) / range.step) as usize;
    }
    None
}

/// Visits every slot in range order as `(slot, lo, hi_inclusive)`.
fn for_each_slot(mut f: impl FnMut(usize, u64, u64)) {
    let mut slot = 0usize;
    for range in BUCKET_RANGES {
        let mut lo = range.start;
        while lo < range.end {
            f(slot, lo, lo + range.step - 1);
            slot += 1;
            lo += range.step;
        }
    }
}

/// True when another line still fits under the soft cap.
fn line_fits(buf: &[u8]) -> bool {
    buf.len() + HISTOGRAM_MAX_LINE + TERMINATOR.len() <= HISTOGRAM_MAX_BYTES
}

// == Size Event ==
/// Cache events classified per object size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeEvent {
    Set,
    Hit,
    Evict,
    Delete,
    Expire,
    Overwrite,
}

// == Size Histogram ==
/// Per-event counters for each size slot.
#[cfg(feature = "size-buckets")]
#[derive(Debug)]
pub struct SizeBuckets {
    sets: Vec<u64>,
    hits: Vec<u64>,
    evicts: Vec<u64>,
    deletes: Vec<u64>,
    expires: Vec<u64>,
    overwrites: Vec<u64>,
}

#[cfg(feature = "size-buckets")]
impl SizeBuckets {
    /// Creates zeroed counters for every configured slot.
    pub fn new() -> Self {
        let n = slot_count();
        Self {
            sets: vec![0; n],
            hits: vec![0; n],
            evicts: vec![0; n],
            deletes: vec![0; n],
            expires: vec![0; n],
            overwrites: vec![0; n],
        }
    }

    /// Counts one event against the slot covering `size`. Sizes outside
    /// every range are dropped.
    pub fn record(&mut self, event: SizeEvent, size: u64) {
        let Some(slot) = slot_of(size) else { return };
        let plane = match event {
            SizeEvent::Set => &mut self.sets,
            SizeEvent::Hit => &mut self.hits,
            SizeEvent::Evict => &mut self.evicts,
            SizeEvent::Delete => &mut self.deletes,
            SizeEvent::Expire => &mut self.expires,
            SizeEvent::Overwrite => &mut self.overwrites,
        };
        plane[slot] += 1;
    }

    /// Zeroes every counter.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Renders one line per slot with any non-zero counter, capped at the
    /// soft output limit, terminated by `END\r\n`.
    pub fn dump(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for_each_slot(|slot, lo, hi| {
            let all_zero = self.sets[slot] == 0
                && self.hits[slot] == 0
                && self.evicts[slot] == 0
                && self.deletes[slot] == 0
                && self.expires[slot] == 0
                && self.overwrites[slot] == 0;
            if all_zero || !line_fits(&buf) {
                return;
            }
            write!(
                buf,
                "{:8}-{:<8}:{:16} sets {:16} hits {:16} evicts {:16} deletes {:16} expires {:16} overwrites\r\n",
                lo,
                hi,
                self.sets[slot],
                self.hits[slot],
                self.evicts[slot],
                self.deletes[slot],
                self.expires[slot],
                self.overwrites[slot],
            )
            .expect("writing to a Vec cannot fail");
        });
        buf.extend_from_slice(TERMINATOR);
        buf
    }
}

#[cfg(feature = "size-buckets")]
impl Default for SizeBuckets {
    fn default() -> Self {
        Self::new()
    }
}

// == Cost-Benefit Histogram ==
/// Per-slot occupancy-time integral ("cost") and hit count ("benefit").
///
/// Occupancy follows the same lazy flush as prefix byte-seconds: before any
/// slot-count change, `slot_seconds += slots * elapsed` for that slot.
#[cfg(feature = "cost-benefit")]
#[derive(Debug)]
pub struct CostBenefitBuckets {
    /// Live objects currently occupying each slot
    slots: Vec<u64>,
    /// Time integral of `slots`, in slot-ticks
    slot_seconds: Vec<u64>,
    /// Hits served from each slot
    hits: Vec<u64>,
    /// Tick of the last flush, per slot
    last_update: Vec<u64>,
}

#[cfg(feature = "cost-benefit")]
impl CostBenefitBuckets {
    /// Creates zeroed accounting for every configured slot.
    pub fn new() -> Self {
        let n = slot_count();
        Self {
            slots: vec![0; n],
            slot_seconds: vec![0; n],
            hits: vec![0; n],
            last_update: vec![0; n],
        }
    }

    fn flush_slot(&mut self, slot: usize, now: u64) {
        if now != self.last_update[slot] {
            self.slot_seconds[slot] += self.slots[slot] * (now - self.last_update[slot]);
            self.last_update[slot] = now;
        }
    }

    /// Accounts a newly stored object of `size`.
    pub fn link(&mut self, size: u64, now: u64) {
        let Some(slot) = slot_of(size) else { return };
        self.flush_slot(slot, now);
        self.slots[slot] += 1;
    }

    /// Accounts removal of an object of `size`. Unmatched unlinks clamp at
    /// zero occupancy.
    pub fn unlink(&mut self, size: u64, now: u64) {
        let Some(slot) = slot_of(size) else { return };
        self.flush_slot(slot, now);
        self.slots[slot] = self.slots[slot].saturating_sub(1);
    }

    /// Counts a hit served by an object of `size`.
    pub fn hit(&mut self, size: u64) {
        let Some(slot) = slot_of(size) else { return };
        self.hits[slot] += 1;
    }

    /// Zeroes every slot.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Flushes every slot up to `now`, then renders one line per slot with
    /// non-zero cost or hits, terminated by `END\r\n`.
    pub fn dump(&mut self, now: u64) -> Vec<u8> {
        for slot in 0..self.slots.len() {
            self.flush_slot(slot, now);
        }
        let mut buf = Vec::new();
        for_each_slot(|slot, lo, hi| {
            if (self.slot_seconds[slot] == 0 && self.hits[slot] == 0) || !line_fits(&buf) {
                return;
            }
            write!(
                buf,
                "{:8}-{:<8}: cost: {:16} hits: {:16}\r\n",
                lo, hi, self.slot_seconds[slot], self.hits[slot],
            )
            .expect("writing to a Vec cannot fail");
        });
        buf.extend_from_slice(TERMINATOR);
        buf
    }
}

#[cfg(feature = "cost-benefit")]
impl Default for CostBenefitBuckets {
    fn default() -> Self {
        Self::new()
    }
}
