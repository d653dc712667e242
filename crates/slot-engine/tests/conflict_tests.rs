//! Tests for the conflict filter.

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::conflict::{
    blocked_intervals, overlaps, BlockedInterval, CommitmentKind, ConflictIndex, LinearScan,
    SortedIndex,
};
use slot_engine::model::{Booking, Offer};
use slot_engine::{is_slot_free, IndexKind, SlotError};

/// Helper to build a UTC instant on 2026-03-01.
fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0).unwrap()
}

fn blocked(start: (u32, u32), end: (u32, u32)) -> BlockedInterval {
    BlockedInterval {
        start: at(start.0, start.1),
        end: at(end.0, end.1),
        kind: CommitmentKind::Booking,
    }
}

fn booking(start: &str, timezone: &str, minutes: i64) -> Booking {
    Booking {
        start_datetime: start.to_string(),
        timezone: timezone.to_string(),
        duration_minutes: minutes,
    }
}

fn offer(start: &str, minutes: i64, voided: bool) -> Offer {
    Offer {
        start_datetime: start.to_string(),
        timezone: "UTC".to_string(),
        duration_minutes: minutes,
        voided,
    }
}

fn both_indexes(intervals: Vec<BlockedInterval>) -> [Box<dyn ConflictIndex>; 2] {
    [
        IndexKind::Linear.build(intervals.clone()),
        IndexKind::Sorted.build(intervals),
    ]
}

// ── Overlap predicate ───────────────────────────────────────────────────────

#[test]
fn partial_overlap_is_a_conflict() {
    assert!(overlaps(at(9, 0), at(10, 0), at(9, 30), at(10, 30)));
    assert!(overlaps(at(9, 30), at(10, 30), at(9, 0), at(10, 0)));
}

#[test]
fn adjacent_intervals_do_not_conflict() {
    assert!(!overlaps(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
    assert!(!overlaps(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
}

#[test]
fn containment_is_a_conflict() {
    assert!(overlaps(at(9, 0), at(12, 0), at(10, 0), at(11, 0)));
    assert!(overlaps(at(10, 0), at(11, 0), at(9, 0), at(12, 0)));
}

// ── Commitment resolution ───────────────────────────────────────────────────

#[test]
fn bookings_and_live_offers_are_blocked_but_voided_offers_are_not() {
    let bookings = vec![booking("2026-03-01T09:00:00Z", "UTC", 60)];
    let offers = vec![
        offer("2026-03-01T11:00:00Z", 30, false),
        offer("2026-03-01T13:00:00Z", 30, true),
    ];

    let intervals = blocked_intervals(&bookings, &offers).unwrap();

    assert_eq!(intervals, vec![
        BlockedInterval { start: at(9, 0), end: at(10, 0), kind: CommitmentKind::Booking },
        BlockedInterval { start: at(11, 0), end: at(11, 30), kind: CommitmentKind::Offer },
    ]);
}

#[test]
fn voided_offer_is_not_even_parsed() {
    let offers = vec![offer("not a date", 30, true)];
    assert!(blocked_intervals(&[], &offers).unwrap().is_empty());
}

#[test]
fn negative_commitment_duration_is_rejected() {
    let bookings = vec![booking("2026-03-01T09:00:00Z", "UTC", -15)];
    assert!(matches!(
        blocked_intervals(&bookings, &[]),
        Err(SlotError::InvalidDuration(_))
    ));
}

#[test]
fn unrepresentable_commitment_duration_is_rejected() {
    // i64::MAX minutes does not fit a TimeDelta; 1e14 minutes fits but
    // pushes the end past the last representable DateTime.
    for minutes in [i64::MAX, 100_000_000_000_000] {
        let bookings = vec![booking("2023-05-01T10:00:00-04:00", "America/New_York", minutes)];
        assert!(matches!(
            blocked_intervals(&bookings, &[]),
            Err(SlotError::InvalidDuration(_))
        ));

        let offers = vec![offer("2023-05-01T14:00:00Z", minutes, false)];
        assert!(matches!(
            blocked_intervals(&[], &offers),
            Err(SlotError::InvalidDuration(_))
        ));
    }
}

#[test]
fn commitment_with_unknown_timezone_is_rejected() {
    let bookings = vec![booking("2026-03-01T09:00:00", "Atlantis/Capital", 60)];
    assert!(matches!(
        BlockedInterval::from_booking(&bookings[0]),
        Err(SlotError::InvalidTimezone(_))
    ));
}

// ── Indexes ─────────────────────────────────────────────────────────────────

#[test]
fn empty_index_blocks_nothing() {
    for index in both_indexes(vec![]) {
        assert!(index.is_free(at(9, 0), at(10, 0)));
    }
}

#[test]
fn overlapping_candidate_is_reported_with_its_source() {
    let intervals = vec![
        blocked((9, 0), (10, 0)),
        BlockedInterval {
            start: at(14, 0),
            end: at(15, 0),
            kind: CommitmentKind::Offer,
        },
    ];

    for index in both_indexes(intervals) {
        let conflict = index.first_conflict(at(14, 30), at(15, 30)).unwrap();
        assert_eq!(conflict.kind, CommitmentKind::Offer);
        assert!(index.first_conflict(at(10, 0), at(11, 0)).is_none());
    }
}

#[test]
fn long_interval_hidden_behind_short_ones_is_found() {
    // Sorted by start, the 08:00-12:00 block comes first and the short
    // 09:00-09:30 block last; only the long one reaches 11:00.
    let intervals = vec![blocked((9, 0), (9, 30)), blocked((8, 0), (12, 0))];

    for index in both_indexes(intervals) {
        assert!(!index.is_free(at(11, 0), at(11, 30)));
        assert!(index.is_free(at(12, 0), at(12, 30)));
    }
}

#[test]
fn candidate_after_every_interval_is_free() {
    let intervals = vec![blocked((8, 0), (9, 0)), blocked((9, 0), (10, 0))];
    let index = SortedIndex::new(intervals);
    assert!(index.is_free(at(10, 0), at(11, 0)));
    assert!(index.is_free(at(7, 0), at(8, 0)));
}

#[test]
fn zero_length_commitment_blocks_only_a_containing_candidate() {
    let intervals = vec![blocked((9, 30), (9, 30))];
    let index = LinearScan::new(intervals.clone());
    let sorted = SortedIndex::new(intervals);

    assert!(!index.is_free(at(9, 0), at(10, 0)));
    assert!(!sorted.is_free(at(9, 0), at(10, 0)));
    assert!(index.is_free(at(9, 30), at(10, 30)));
    assert!(sorted.is_free(at(9, 30), at(10, 30)));
}

// ── One-off check ───────────────────────────────────────────────────────────

#[test]
fn single_slot_check_respects_both_sources() {
    let bookings = vec![booking("2026-03-01T04:00:00-05:00", "America/New_York", 60)];
    let offers = vec![offer("2026-03-01T12:00:00Z", 60, false)];

    // The booking is 09:00-10:00 UTC.
    assert!(!is_slot_free(at(9, 30), 30, &bookings, &offers).unwrap());
    assert!(is_slot_free(at(10, 0), 120, &bookings, &offers).unwrap());
    assert!(!is_slot_free(at(11, 0), 120, &bookings, &offers).unwrap());
}
