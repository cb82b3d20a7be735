//! Report Renderer Module
//!
//! Serializes the prefix table and wildcard record into one plain-text
//! snapshot. The buffer is sized up front with an upper bound that assumes
//! every numeric field needs 20 digits, so the append pass never
//! reallocates; overrunning that bound would mean the sizing arithmetic is
//! wrong and is treated as a fatal fault, never as silent truncation.

use std::io::Write;

use crate::stats::{PrefixRecord, PrefixStats, TERMINATOR, WILDCARD_NAME};

// == Sizing ==
/// Widest decimal rendering of any counter field.
const MAX_FIELD_DIGITS: usize = 20;

/// Numeric fields per report line.
const NUM_FIELDS: usize = 11;

/// The fixed text of one report line (everything except the prefix name and
/// the numeric field values).
const LINE_LABELS: &str =
    "PREFIX  item  get  hit  set  del  evict  ov  exp  bytes  txed  byte-seconds \r\n";

/// Upper bound on one line, name excluded.
const LINE_OVERHEAD: usize = LINE_LABELS.len() + NUM_FIELDS * MAX_FIELD_DIGITS;

// == Checked Report Buffer ==
/// Append-only byte buffer with a precomputed capacity. Every record append
/// asserts that the trailing terminator still fits; the capacity bound is an
/// internal consistency invariant, not a runtime condition.
struct ReportBuf {
    buf: Vec<u8>,
    capacity: usize,
}

impl ReportBuf {
    /// Acquires the full buffer up front; `None` when the allocation fails,
    /// in which case the whole report is withheld rather than emitted
    /// partially.
    fn with_capacity(capacity: usize) -> Option<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity).ok()?;
        Some(Self { buf, capacity })
    }

    /// Appends one fully formatted record line.
    fn append_record(&mut self, name: &[u8], record: &PrefixRecord) {
        self.buf.extend_from_slice(b"PREFIX ");
        self.buf.extend_from_slice(name);
        write!(
            self.buf,
            " item {} get {} hit {} set {} del {} evict {} ov {} exp {} bytes {} txed {} byte-seconds {}\r\n",
            record.num_items,
            record.num_gets,
            record.num_hits,
            record.num_sets,
            record.num_deletes,
            record.num_evicts,
            record.num_overwrites,
            record.num_expires,
            record.num_bytes,
            record.bytes_txed,
            record.total_byte_seconds,
        )
        .expect("writing to a Vec cannot fail");
        assert!(
            self.buf.len() + TERMINATOR.len() <= self.capacity,
            "prefix report overran its pre-sized buffer"
        );
    }

    /// Appends the terminator and hands back the exact report bytes.
    fn finish(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(TERMINATOR);
        assert!(
            self.buf.len() <= self.capacity,
            "prefix report overran its pre-sized buffer"
        );
        self.buf
    }
}

// == Renderer ==
impl PrefixStats {
    /// Renders the full prefix report: every table record (bucket index
    /// ascending, newest first within a bucket), then the wildcard line if
    /// the wildcard has seen any get/set/delete traffic, then `END\r\n`.
    ///
    /// Every record's byte-seconds integral is flushed to the current tick
    /// before it is emitted. Returns `None` only when the report buffer
    /// cannot be allocated ("stats unavailable"), never a partial report.
    pub fn dump(&mut self) -> Option<Vec<u8>> {
        let (table, wildcard, clock) = self.parts_for_report();
        let now = clock.now();

        let size = table.total_prefix_len()
            + (table.num_prefixes() + 1) * LINE_OVERHEAD
            + WILDCARD_NAME.len()
            + TERMINATOR.len();
        let mut buf = ReportBuf::with_capacity(size)?;

        for record in table.iter_mut() {
            record.flush_byte_seconds(now);
            buf.append_record(record.prefix(), record);
        }

        wildcard.flush_byte_seconds(now);
        if wildcard.has_traffic() {
            buf.append_record(WILDCARD_NAME, wildcard);
        }

        Some(buf.finish())
    }
}
