//! Tests for per-day interval slicing and range expansion strategies.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use slot_engine::dst::DstPolicy;
use slot_engine::model::{AvailabilityRange, TimeOfDay};
use slot_engine::slicer::{
    Candidate, IndependentRanges, MergedRanges, RangeExpansion, Slicer, WeeklyTemplate,
};
use slot_engine::weekday::DayOfWeek;
use slot_engine::SlotError;

const NEW_YORK: Tz = chrono_tz::America::New_York;

fn range(day: DayOfWeek, start: (u32, u32), end: (u32, u32)) -> AvailabilityRange {
    AvailabilityRange::new(
        day,
        TimeOfDay::new(start.0, start.1),
        TimeOfDay::new(end.0, end.1),
    )
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 2023-05-01, a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
}

fn local_starts(candidates: &[Candidate]) -> Vec<String> {
    candidates
        .iter()
        .map(|c| c.start.format("%H:%M").to_string())
        .collect()
}

fn slice(ranges: &[AvailabilityRange], expansion: &dyn RangeExpansion, minutes: u32) -> Vec<Candidate> {
    let template = WeeklyTemplate::new(ranges).unwrap();
    Slicer::new(&template, expansion, minutes, NEW_YORK, DstPolicy::default()).slice(monday())
}

// ── Slicing ─────────────────────────────────────────────────────────────────

#[test]
fn range_is_cut_into_back_to_back_candidates() {
    let candidates = slice(&[range(DayOfWeek::Monday, (9, 0), (12, 0))], &IndependentRanges, 60);

    assert_eq!(local_starts(&candidates), vec!["09:00", "10:00", "11:00"]);
    for c in &candidates {
        assert_eq!((c.end - c.start).num_minutes(), 60);
    }
}

#[test]
fn last_candidate_ends_exactly_at_range_end() {
    let candidates = slice(&[range(DayOfWeek::Monday, (9, 0), (10, 0))], &IndependentRanges, 20);

    assert_eq!(local_starts(&candidates), vec!["09:00", "09:20", "09:40"]);
    assert_eq!(candidates[2].end.format("%H:%M").to_string(), "10:00");
}

#[test]
fn remainder_shorter_than_duration_is_dropped() {
    let candidates = slice(&[range(DayOfWeek::Monday, (9, 0), (10, 30))], &IndependentRanges, 60);
    assert_eq!(local_starts(&candidates), vec!["09:00"]);
}

#[test]
fn range_shorter_than_duration_yields_nothing() {
    let candidates = slice(&[range(DayOfWeek::Monday, (9, 0), (9, 45))], &IndependentRanges, 60);
    assert!(candidates.is_empty());
}

#[test]
fn other_weekdays_are_ignored() {
    let candidates = slice(
        &[
            range(DayOfWeek::Tuesday, (9, 0), (17, 0)),
            range(DayOfWeek::Sunday, (9, 0), (17, 0)),
        ],
        &IndependentRanges,
        60,
    );
    assert!(candidates.is_empty());
}

#[test]
fn inverted_and_zero_length_ranges_yield_nothing() {
    let candidates = slice(
        &[
            range(DayOfWeek::Monday, (12, 0), (9, 0)),
            range(DayOfWeek::Monday, (10, 0), (10, 0)),
        ],
        &IndependentRanges,
        30,
    );
    assert!(candidates.is_empty());
}

#[test]
fn candidates_are_anchored_in_the_provider_timezone() {
    let candidates = slice(&[range(DayOfWeek::Monday, (9, 0), (10, 0))], &IndependentRanges, 60);
    // 09:00 EDT is 13:00 UTC.
    assert_eq!(candidates[0].start.to_rfc3339(), "2023-05-01T09:00:00-04:00");
}

#[test]
fn repeated_fall_back_hour_is_sliced_once() {
    // 2024-11-03 is a Sunday; 01:00-02:00 happens twice in New York.
    let template = WeeklyTemplate::new(&[range(DayOfWeek::Sunday, (0, 30), (3, 0))]).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
    let candidates = Slicer::new(&template, &IndependentRanges, 30, NEW_YORK, DstPolicy::default())
        .slice(sunday);

    assert_eq!(
        local_starts(&candidates),
        vec!["00:30", "01:00", "01:30", "02:00", "02:30"]
    );
    // The 01:00 and 01:30 that survive are the first (EDT) pass.
    assert_eq!(candidates[1].start.to_rfc3339(), "2024-11-03T01:00:00-04:00");
    assert_eq!(candidates[2].start.to_rfc3339(), "2024-11-03T01:30:00-04:00");
    assert_eq!(candidates[3].start.to_rfc3339(), "2024-11-03T02:00:00-05:00");
}

#[test]
fn malformed_times_fail_template_validation() {
    let result = WeeklyTemplate::new(&[range(DayOfWeek::Monday, (9, 60), (10, 0))]);
    assert!(matches!(result, Err(SlotError::InvalidTime(_))));
}

// ── Expansion strategies ────────────────────────────────────────────────────

#[test]
fn independent_ranges_keep_overlaps_and_duplicates() {
    let ranges = [
        range(DayOfWeek::Monday, (9, 0), (11, 0)),
        range(DayOfWeek::Monday, (9, 0), (11, 0)),
    ];
    let candidates = slice(&ranges, &IndependentRanges, 60);
    assert_eq!(local_starts(&candidates), vec!["09:00", "10:00", "09:00", "10:00"]);
}

#[test]
fn merged_ranges_coalesce_overlaps() {
    let template = WeeklyTemplate::new(&[
        range(DayOfWeek::Monday, (13, 0), (15, 0)),
        range(DayOfWeek::Monday, (9, 0), (11, 0)),
        range(DayOfWeek::Monday, (10, 0), (12, 0)),
        range(DayOfWeek::Monday, (10, 30), (11, 30)),
    ])
    .unwrap();

    let windows = MergedRanges.windows_for(&template, DayOfWeek::Monday);
    assert_eq!(
        windows,
        vec![(time(9, 0), time(12, 0)), (time(13, 0), time(15, 0))]
    );
}

#[test]
fn merged_ranges_keep_touching_ranges_apart() {
    let template = WeeklyTemplate::new(&[
        range(DayOfWeek::Monday, (9, 0), (10, 0)),
        range(DayOfWeek::Monday, (10, 0), (11, 0)),
    ])
    .unwrap();

    let windows = MergedRanges.windows_for(&template, DayOfWeek::Monday);
    assert_eq!(windows.len(), 2);
}

#[test]
fn merged_ranges_drop_inverted_ranges() {
    let template = WeeklyTemplate::new(&[
        range(DayOfWeek::Monday, (17, 0), (8, 0)),
        range(DayOfWeek::Monday, (9, 0), (10, 0)),
    ])
    .unwrap();

    let windows = MergedRanges.windows_for(&template, DayOfWeek::Monday);
    assert_eq!(windows, vec![(time(9, 0), time(10, 0))]);
}

#[test]
fn independent_ranges_preserve_configuration_order() {
    let template = WeeklyTemplate::new(&[
        range(DayOfWeek::Monday, (14, 0), (15, 0)),
        range(DayOfWeek::Friday, (9, 0), (10, 0)),
        range(DayOfWeek::Monday, (9, 0), (10, 0)),
    ])
    .unwrap();

    let windows = IndependentRanges.windows_for(&template, DayOfWeek::Monday);
    assert_eq!(
        windows,
        vec![(time(14, 0), time(15, 0)), (time(9, 0), time(10, 0))]
    );
}
