//! Reject candidates that overlap committed time.
//!
//! Bookings always block; offers block only while not voided. Every
//! commitment is converted to an absolute UTC interval before comparison, so
//! commitments recorded in different timezones compare correctly against
//! candidates in the provider's timezone.
//!
//! Two intervals overlap when `a.start < b.end && b.start < a.end`. Adjacent
//! intervals (one ends exactly when the other starts) do NOT conflict.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::model::{Booking, Offer};
use crate::timezone::parse_instant;

/// Where a blocked interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentKind {
    Booking,
    Offer,
}

/// A committed interval in absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: CommitmentKind,
}

impl BlockedInterval {
    fn resolve(
        start_datetime: &str,
        timezone: &str,
        duration_minutes: i64,
        kind: CommitmentKind,
    ) -> Result<Self> {
        if duration_minutes < 0 {
            return Err(SlotError::InvalidDuration(format!(
                "{:?} starting {} has negative duration {}",
                kind, start_datetime, duration_minutes
            )));
        }
        let start = parse_instant(start_datetime, timezone)?;
        let end = Duration::try_minutes(duration_minutes)
            .and_then(|duration| start.checked_add_signed(duration))
            .ok_or_else(|| {
                SlotError::InvalidDuration(format!(
                    "{:?} starting {} has out-of-range duration {}",
                    kind, start_datetime, duration_minutes
                ))
            })?;
        Ok(Self { start, end, kind })
    }

    pub fn from_booking(booking: &Booking) -> Result<Self> {
        Self::resolve(
            &booking.start_datetime,
            &booking.timezone,
            booking.duration_minutes,
            CommitmentKind::Booking,
        )
    }

    /// Resolve an offer, or `None` if it has been voided.
    ///
    /// Voided offers are not parsed at all.
    pub fn from_offer(offer: &Offer) -> Result<Option<Self>> {
        if offer.voided {
            return Ok(None);
        }
        Self::resolve(
            &offer.start_datetime,
            &offer.timezone,
            offer.duration_minutes,
            CommitmentKind::Offer,
        )
        .map(Some)
    }

    /// Whether this interval overlaps `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        overlaps(start, end, self.start, self.end)
    }
}

/// Half-open interval intersection test.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Resolve every booking and every live offer into blocked intervals.
///
/// # Errors
///
/// Fails on the first commitment with an unknown timezone, an unparseable
/// start, or a negative or out-of-range duration.
pub fn blocked_intervals(bookings: &[Booking], offers: &[Offer]) -> Result<Vec<BlockedInterval>> {
    let mut intervals = bookings
        .iter()
        .map(BlockedInterval::from_booking)
        .collect::<Result<Vec<_>>>()?;

    for offer in offers {
        if let Some(interval) = BlockedInterval::from_offer(offer)? {
            intervals.push(interval);
        }
    }

    Ok(intervals)
}

/// Answers whether a candidate interval is free of commitments.
pub trait ConflictIndex: Send + Sync {
    /// Some commitment overlapping `[start, end)`, if any.
    fn first_conflict(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<&BlockedInterval>;

    fn is_free(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.first_conflict(start, end).is_none()
    }
}

/// Which [`ConflictIndex`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Brute-force scan of every commitment per candidate.
    #[default]
    Linear,
    /// Start-sorted intervals with a running max end, searched by bisection.
    Sorted,
}

impl IndexKind {
    pub fn build(self, intervals: Vec<BlockedInterval>) -> Box<dyn ConflictIndex> {
        match self {
            IndexKind::Linear => Box::new(LinearScan::new(intervals)),
            IndexKind::Sorted => Box::new(SortedIndex::new(intervals)),
        }
    }
}

/// Checks every commitment for every candidate.
#[derive(Debug, Clone, Default)]
pub struct LinearScan {
    intervals: Vec<BlockedInterval>,
}

impl LinearScan {
    pub fn new(intervals: Vec<BlockedInterval>) -> Self {
        Self { intervals }
    }
}

impl ConflictIndex for LinearScan {
    fn first_conflict(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<&BlockedInterval> {
        self.intervals.iter().find(|b| b.overlaps(start, end))
    }
}

/// Intervals sorted by start, with `max_end[i]` the latest end among the
/// first `i + 1` intervals.
#[derive(Debug, Clone, Default)]
pub struct SortedIndex {
    intervals: Vec<BlockedInterval>,
    max_end: Vec<DateTime<Utc>>,
}

impl SortedIndex {
    pub fn new(mut intervals: Vec<BlockedInterval>) -> Self {
        intervals.sort_by_key(|b| (b.start, b.end));

        let mut max_end = Vec::with_capacity(intervals.len());
        let mut running: Option<DateTime<Utc>> = None;
        for interval in &intervals {
            let latest = running.map_or(interval.end, |r| r.max(interval.end));
            max_end.push(latest);
            running = Some(latest);
        }

        Self { intervals, max_end }
    }
}

impl ConflictIndex for SortedIndex {
    fn first_conflict(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<&BlockedInterval> {
        // Intervals [0, before) start strictly before the candidate ends.
        let before = self.intervals.partition_point(|b| b.start < end);
        if before == 0 || self.max_end[before - 1] <= start {
            return None;
        }
        self.intervals[..before]
            .iter()
            .rev()
            .find(|b| b.overlaps(start, end))
    }
}

/// Decide whether a single `[start, start + duration_mins)` interval is free.
///
/// Convenience for one-off checks (e.g. re-validating a slot at checkout).
/// Generation builds the index once instead.
pub fn is_slot_free(
    start: DateTime<Utc>,
    duration_mins: u32,
    bookings: &[Booking],
    offers: &[Offer],
) -> Result<bool> {
    let index = LinearScan::new(blocked_intervals(bookings, offers)?);
    Ok(index.is_free(start, start + Duration::minutes(duration_mins as i64)))
}
