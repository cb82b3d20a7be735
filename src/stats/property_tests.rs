//! Property-Based Tests for the Prefix Stats Engine
//!
//! Uses proptest to check the aggregation invariants: counter accuracy
//! against a naive model, exactness of the byte-seconds integral, and
//! well-formedness of the pre-sized report across arbitrary key shapes.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::stats::{ByteChangeFlags, CoarseClock, PrefixStats, RemovalCause};

// == Test Configuration ==
const DELIMITER: u8 = b':';

fn engine() -> (PrefixStats, Arc<CoarseClock>) {
    let clock = Arc::new(CoarseClock::new());
    (PrefixStats::new(DELIMITER, clock.clone()), clock)
}

/// Prefix a key routes to in the naive model; `None` means wildcard.
fn model_prefix(key: &str) -> Option<String> {
    key.split_once(':').map(|(prefix, _)| prefix.to_string())
}

// == Strategies ==
/// Keys over a small alphabet so runs revisit the same prefixes, with and
/// without a delimiter.
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-c]{1,3}:[a-z0-9]{0,6}",
        "[a-c]{1,5}", // no delimiter: wildcard traffic
    ]
}

#[derive(Debug, Clone)]
enum StatsOp {
    Get { key: String, hit: bool, bytes: u16 },
    Set { key: String },
    Delete { key: String },
}

fn stats_op_strategy() -> impl Strategy<Value = StatsOp> {
    prop_oneof![
        (key_strategy(), any::<bool>(), any::<u16>())
            .prop_map(|(key, hit, bytes)| StatsOp::Get { key, hit, bytes }),
        key_strategy().prop_map(|key| StatsOp::Set { key }),
        key_strategy().prop_map(|key| StatsOp::Delete { key }),
    ]
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ModelCounters {
    gets: u64,
    hits: u64,
    sets: u64,
    deletes: u64,
    bytes_txed: u64,
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* sequence of get/set/delete events, every prefix's counters
    // equal those of a naive per-prefix model, and keys sharing a prefix
    // always land on the same record.
    #[test]
    fn prop_counter_accuracy(ops in prop::collection::vec(stats_op_strategy(), 1..60)) {
        let (mut stats, _clock) = engine();
        let mut model: HashMap<Option<String>, ModelCounters> = HashMap::new();

        for op in &ops {
            match op {
                StatsOp::Get { key, hit, bytes } => {
                    stats.record_get(key.as_bytes(), *hit, u64::from(*bytes));
                    let m = model.entry(model_prefix(key)).or_default();
                    m.gets += 1;
                    if *hit {
                        m.hits += 1;
                        m.bytes_txed += u64::from(*bytes);
                    }
                }
                StatsOp::Set { key } => {
                    stats.record_set(key.as_bytes());
                    model.entry(model_prefix(key)).or_default().sets += 1;
                }
                StatsOp::Delete { key } => {
                    stats.record_delete(key.as_bytes());
                    model.entry(model_prefix(key)).or_default().deletes += 1;
                }
            }
        }

        let table_prefixes = model.keys().filter(|p| p.is_some()).count();
        prop_assert_eq!(stats.num_prefixes(), table_prefixes, "one record per prefix");

        for (prefix, expected) in &model {
            let probe = match prefix {
                Some(p) => format!("{}:probe", p),
                None => "probewithnodelimiter".to_string(),
            };
            let record = stats.lookup(probe.as_bytes()).expect("recorded prefix must exist");
            prop_assert_eq!(record.num_gets, expected.gets);
            prop_assert_eq!(record.num_hits, expected.hits);
            prop_assert_eq!(record.num_sets, expected.sets);
            prop_assert_eq!(record.num_deletes, expected.deletes);
            prop_assert_eq!(record.bytes_txed, expected.bytes_txed);
        }
    }

    // *For any* scripted sequence of byte-total changes at controlled
    // ticks, `total_byte_seconds` equals the exact Riemann sum of the live
    // byte count over elapsed time, and never decreases.
    #[test]
    fn prop_byte_seconds_is_exact_riemann_sum(
        steps in prop::collection::vec((0u64..4, -500i64..500), 1..40)
    ) {
        let (mut stats, clock) = engine();
        let mut expected_bytes: u64 = 0;
        let mut expected_integral: u64 = 0;
        let mut last_integral: u64 = 0;
        let mut now: u64 = 0;

        for (dt, delta) in &steps {
            now += dt;
            clock.set(now);
            // Keep the live byte total non-negative so the integral stays
            // meaningful across the whole run.
            let delta = (*delta).max(-(expected_bytes as i64));
            expected_integral += expected_bytes * dt;
            expected_bytes = expected_bytes.wrapping_add_signed(delta);
            stats.record_byte_total_change(b"p:1", delta, ByteChangeFlags::default());

            let record = stats.lookup(b"p:1").unwrap();
            prop_assert!(record.total_byte_seconds >= last_integral, "integral must not decrease");
            last_integral = record.total_byte_seconds;
        }

        let record = stats.lookup(b"p:1").unwrap();
        prop_assert_eq!(record.num_bytes, expected_bytes);
        prop_assert_eq!(record.total_byte_seconds, expected_integral);
    }

    // *For any* set of keys, including long prefixes, the report renders
    // inside its precomputed bound (the checked appender panics otherwise),
    // covers every distinct prefix exactly once, and is deterministic at a
    // fixed tick.
    #[test]
    fn prop_report_covers_every_prefix(
        keys in prop::collection::vec("[a-z]{1,120}:[a-z0-9]{0,10}", 1..50)
    ) {
        let (mut stats, _clock) = engine();
        let mut distinct: HashSet<String> = HashSet::new();

        for key in &keys {
            stats.record_set(key.as_bytes());
            stats.record_get(key.as_bytes(), true, key.len() as u64);
            distinct.insert(model_prefix(key).expect("generated keys carry a delimiter"));
        }

        let report = stats.dump().expect("report must render");
        prop_assert!(report.ends_with(b"END\r\n"));

        let text = String::from_utf8(report.clone()).unwrap();
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        prop_assert_eq!(lines.len(), distinct.len() + 1, "one line per prefix plus END");

        let again = stats.dump().expect("report must render");
        prop_assert_eq!(report, again, "report is deterministic at a fixed tick");
    }

    // *For any* prefix and pair of suffixes, both keys resolve to the same
    // record identity, and a delimiter-less key never does.
    #[test]
    fn prop_shared_prefix_shares_record(
        prefix in "[a-z]{1,12}",
        suffix_a in "[a-z0-9]{0,8}",
        suffix_b in "[a-z0-9]{0,8}",
    ) {
        let (mut stats, _clock) = engine();

        let key_a = format!("{}:{}", prefix, suffix_a);
        let key_b = format!("{}:{}", prefix, suffix_b);
        stats.record_get(key_a.as_bytes(), false, 0);
        stats.record_get(key_b.as_bytes(), false, 0);

        let record_a = stats.lookup(key_a.as_bytes()).unwrap();
        let record_b = stats.lookup(key_b.as_bytes()).unwrap();
        prop_assert!(std::ptr::eq(record_a, record_b), "same prefix, same record");
        prop_assert_eq!(record_a.num_gets, 2);

        let wildcard = stats.lookup(prefix.as_bytes()).unwrap();
        prop_assert!(!std::ptr::eq(record_a, wildcard), "wildcard is distinct");
    }

    // *For any* mixed workload, clearing leaves a report of exactly END.
    #[test]
    fn prop_clear_then_dump_is_terminator(ops in prop::collection::vec(stats_op_strategy(), 1..30)) {
        let (mut stats, clock) = engine();

        for op in &ops {
            match op {
                StatsOp::Get { key, hit, bytes } => {
                    stats.record_get(key.as_bytes(), *hit, u64::from(*bytes))
                }
                StatsOp::Set { key } => stats.record_set(key.as_bytes()),
                StatsOp::Delete { key } => stats.record_delete(key.as_bytes()),
            }
        }
        stats.record_removal(b"x:y", 10, RemovalCause::Evicted);
        clock.advance(3);
        stats.clear();

        let report = stats.dump().expect("report must render");
        prop_assert_eq!(report.len(), 5);
        prop_assert_eq!(&report[..], b"END\r\n");
    }
}
