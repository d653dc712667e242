//! Expand a weekly availability template into fixed-duration candidates.
//!
//! For one calendar day, every template window labelled with that day's
//! weekday is anchored in the provider's timezone and cut into back-to-back
//! candidates of exactly the requested duration. A trailing remainder shorter
//! than the duration is dropped. Windows whose start is not before their end
//! produce nothing.
//!
//! Which windows get sliced is decided by a [`RangeExpansion`] strategy:
//! [`IndependentRanges`] slices every configured range as-is (overlapping
//! ranges can therefore produce duplicate candidates), while [`MergedRanges`]
//! coalesces overlapping ranges first.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use tracing::warn;

use crate::dst::{localize, DstPolicy};
use crate::error::Result;
use crate::model::AvailabilityRange;
use crate::weekday::{weekday_label, DayOfWeek};

/// An availability range with validated wall-clock bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenWindow {
    pub day_of_week: DayOfWeek,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OpenWindow {
    fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A provider's recurring weekly availability, validated once per request.
#[derive(Debug, Clone, Default)]
pub struct WeeklyTemplate {
    windows: Vec<OpenWindow>,
}

impl WeeklyTemplate {
    /// Validate every range's times.
    ///
    /// Malformed times (hour 24, minute 60, …) are rejected. Ranges whose
    /// start is not before their end are kept but logged; they yield no slots.
    pub fn new(ranges: &[AvailabilityRange]) -> Result<Self> {
        let windows = ranges
            .iter()
            .map(|range| -> Result<OpenWindow> {
                let window = OpenWindow {
                    day_of_week: range.day_of_week,
                    start: range.start_time.to_naive()?,
                    end: range.end_time.to_naive()?,
                };
                if window.is_empty() {
                    warn!(
                        day = ?range.day_of_week,
                        start = %range.start_time,
                        end = %range.end_time,
                        "availability range is empty or inverted, it will yield no slots"
                    );
                }
                Ok(window)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { windows })
    }

    /// Windows labelled with `day`, in configuration order.
    pub fn on(&self, day: DayOfWeek) -> impl Iterator<Item = &OpenWindow> + '_ {
        self.windows.iter().filter(move |w| w.day_of_week == day)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Strategy deciding which wall-clock windows are sliced for a weekday.
pub trait RangeExpansion: Send + Sync {
    /// `(start, end)` pairs to slice for `day`.
    fn windows_for(&self, template: &WeeklyTemplate, day: DayOfWeek) -> Vec<(NaiveTime, NaiveTime)>;
}

/// Slice each configured range independently, duplicates included.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndependentRanges;

impl RangeExpansion for IndependentRanges {
    fn windows_for(&self, template: &WeeklyTemplate, day: DayOfWeek) -> Vec<(NaiveTime, NaiveTime)> {
        template.on(day).map(|w| (w.start, w.end)).collect()
    }
}

/// Merge overlapping ranges of the same weekday before slicing.
///
/// Ranges that merely touch (one ends when the next starts) stay separate so
/// the slot grid of each is unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergedRanges;

impl RangeExpansion for MergedRanges {
    fn windows_for(&self, template: &WeeklyTemplate, day: DayOfWeek) -> Vec<(NaiveTime, NaiveTime)> {
        let mut windows: Vec<(NaiveTime, NaiveTime)> = template
            .on(day)
            .filter(|w| !w.is_empty())
            .map(|w| (w.start, w.end))
            .collect();
        windows.sort();

        let mut merged: Vec<(NaiveTime, NaiveTime)> = Vec::with_capacity(windows.len());
        for (start, end) in windows {
            if let Some(last) = merged.last_mut() {
                if start < last.1 {
                    last.1 = last.1.max(end);
                    continue;
                }
            }
            merged.push((start, end));
        }
        merged
    }
}

/// A candidate slot, anchored in the provider's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Cuts the template windows of one day into candidates.
pub struct Slicer<'a> {
    template: &'a WeeklyTemplate,
    expansion: &'a dyn RangeExpansion,
    duration: Duration,
    tz: Tz,
    policy: DstPolicy,
}

impl<'a> Slicer<'a> {
    pub fn new(
        template: &'a WeeklyTemplate,
        expansion: &'a dyn RangeExpansion,
        duration_mins: u32,
        tz: Tz,
        policy: DstPolicy,
    ) -> Self {
        Self {
            template,
            expansion,
            duration: Duration::minutes(duration_mins as i64),
            tz,
            policy,
        }
    }

    /// Every candidate start for `day`, in window order.
    ///
    /// Range boundaries are localized to instants in the provider timezone and
    /// candidates step by absolute duration, so a window spanning a DST
    /// transition holds exactly as many candidates as its real length allows.
    ///
    /// A candidate is only kept if its local wall-clock reading resolves back
    /// to its own instant. Starts in the second pass through a repeated
    /// fall-back hour read the same as the first pass and are dropped.
    pub fn slice(&self, day: NaiveDate) -> Vec<Candidate> {
        if self.duration <= Duration::zero() {
            return Vec::new();
        }

        let label = weekday_label(day.weekday());
        let mut candidates = Vec::new();

        for (start, end) in self.expansion.windows_for(self.template, label) {
            let (Some(range_start), Some(range_end)) = (
                localize(day.and_time(start), &self.tz, self.policy),
                localize(day.and_time(end), &self.tz, self.policy),
            ) else {
                warn!(%day, %start, %end, "range boundary falls in a DST gap, skipping range");
                continue;
            };

            let mut slot_start = range_start;
            while slot_start + self.duration <= range_end {
                if self.reads_back(slot_start) {
                    candidates.push(Candidate {
                        start: slot_start,
                        end: slot_start + self.duration,
                    });
                }
                slot_start += self.duration;
            }
        }

        candidates
    }

    fn reads_back(&self, start: DateTime<Tz>) -> bool {
        self.tz.from_local_datetime(&start.naive_local()).earliest() == Some(start)
    }
}
