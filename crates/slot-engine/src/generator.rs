//! Slot generation: walk → slice → filter.
//!
//! The generator is a pure function of its arguments. It never reads the
//! system clock, performs no I/O and keeps no state between calls.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::calendar::{walk_days, window_len};
use crate::conflict::{blocked_intervals, IndexKind};
use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::model::{AvailabilityRange, Booking, DateWindow, Offer, Slot};
use crate::slicer::{IndependentRanges, MergedRanges, RangeExpansion, Slicer, WeeklyTemplate};
use crate::timezone::parse_timezone;

/// Default upper bound on the number of days a single request may span.
pub const DEFAULT_MAX_WINDOW_DAYS: u32 = 366;

/// Tuning knobs for [`generate_slots_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// How range boundaries inside a DST gap are resolved.
    pub dst_policy: DstPolicy,
    /// Merge overlapping ranges of a weekday before slicing. Off by default,
    /// in which case overlapping ranges can yield duplicate slots.
    pub merge_ranges: bool,
    /// Conflict lookup structure.
    pub index: IndexKind,
    /// Reject windows longer than this many days. `None` disables the check.
    pub max_window_days: Option<u32>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            dst_policy: DstPolicy::default(),
            merge_ranges: false,
            index: IndexKind::default(),
            max_window_days: Some(DEFAULT_MAX_WINDOW_DAYS),
        }
    }
}

/// Compute the bookable slots for a provider over a date window.
///
/// Uses [`GenerateOptions::default`]. See [`generate_slots_with_options`].
pub fn generate_slots(
    availability: &[AvailabilityRange],
    duration_mins: u32,
    window: &DateWindow,
    bookings: &[Booking],
    offers: &[Offer],
    timezone: &str,
) -> Result<Vec<Slot>> {
    generate_slots_with_options(
        availability,
        duration_mins,
        window,
        bookings,
        offers,
        timezone,
        &GenerateOptions::default(),
    )
}

/// Compute the bookable slots for a provider over a date window.
///
/// Slots are ordered by day, then by start time. Each spans exactly
/// `duration_mins`, starts on a day in `[window.start_date, window.end_date)`
/// in `timezone`, and overlaps no booking and no non-voided offer.
///
/// # Arguments
/// - `availability` -- The provider's weekly template, in `timezone`
/// - `duration_mins` -- Length of every slot
/// - `window` -- Calendar days to search, end exclusive
/// - `bookings` -- Confirmed commitments, each in its own timezone
/// - `offers` -- Pending holds; voided ones are ignored
/// - `timezone` -- The provider's IANA timezone
/// - `options` -- DST policy, range merging, conflict index, window bound
///
/// # Errors
/// Everything is validated before any slot is produced:
/// - [`SlotError::InvalidTimezone`] for an unknown provider or commitment zone
/// - [`SlotError::InvalidDuration`] for a zero slot duration or a negative or
///   unrepresentably large commitment duration
/// - [`SlotError::InvalidDate`] / [`SlotError::InvalidWindow`] for malformed,
///   empty or inverted windows, [`SlotError::WindowTooLarge`] past the bound
/// - [`SlotError::InvalidTime`] for malformed template times
/// - [`SlotError::InvalidDatetime`] for unparseable commitment starts
///
/// An empty template or a fully booked window is not an error: the result is
/// simply empty.
pub fn generate_slots_with_options(
    availability: &[AvailabilityRange],
    duration_mins: u32,
    window: &DateWindow,
    bookings: &[Booking],
    offers: &[Offer],
    timezone: &str,
    options: &GenerateOptions,
) -> Result<Vec<Slot>> {
    let tz = parse_timezone(timezone)?;

    if duration_mins == 0 {
        return Err(SlotError::InvalidDuration(
            "slot duration must be at least one minute".to_string(),
        ));
    }

    let (start, end) = window.to_naive()?;
    if end <= start {
        return Err(SlotError::InvalidWindow(format!(
            "end date {} must be after start date {}",
            window.end_date, window.start_date
        )));
    }
    let days = window_len(start, end);
    if let Some(max) = options.max_window_days {
        if days > i64::from(max) {
            return Err(SlotError::WindowTooLarge { days, max });
        }
    }

    let template = WeeklyTemplate::new(availability)?;
    let index = options.index.build(blocked_intervals(bookings, offers)?);

    let expansion: &dyn RangeExpansion = if options.merge_ranges {
        &MergedRanges
    } else {
        &IndependentRanges
    };
    let slicer = Slicer::new(&template, expansion, duration_mins, tz, options.dst_policy);

    let mut slots = Vec::new();
    let mut candidate_count = 0usize;

    for day in walk_days(start, end) {
        let mut candidates = slicer.slice(day);
        // Stable, so duplicates from overlapping ranges keep their order.
        candidates.sort_by_key(|c| c.start);
        candidate_count += candidates.len();

        for candidate in candidates {
            let slot_start = candidate.start.with_timezone(&Utc);
            let slot_end = candidate.end.with_timezone(&Utc);
            if let Some(blocking) = index.first_conflict(slot_start, slot_end) {
                trace!(
                    start = %candidate.start,
                    kind = ?blocking.kind,
                    blocked_from = %blocking.start,
                    blocked_until = %blocking.end,
                    "candidate blocked"
                );
                continue;
            }

            let local = candidate.start.naive_local();
            // A gap-shifted start can land on the next calendar day.
            if local.date() >= end {
                continue;
            }
            slots.push(Slot {
                date: local.date().into(),
                time: local.time().into(),
                duration_mins,
            });
        }
    }

    debug!(
        timezone,
        days,
        candidates = candidate_count,
        slots = slots.len(),
        "generated slots"
    );

    Ok(slots)
}
