//! Value types exchanged with the data layer and the query endpoint.
//!
//! All of these are plain read-only snapshots. Field-level validation happens
//! when a value is converted into its `chrono` counterpart, so a request can
//! be deserialized first and rejected with a precise message later.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::weekday::DayOfWeek;

/// A wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Validate and convert to a [`NaiveTime`].
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidTime`] if the hour is not in `0..=23` or the
    /// minute is not in `0..=59`.
    pub fn to_naive(self) -> Result<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .ok_or_else(|| SlotError::InvalidTime(self.to_string()))
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self::new(time.hour(), time.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A calendar day without any timezone attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Validate and convert to a [`NaiveDate`].
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidDate`] if the fields do not name a real
    /// Gregorian date (e.g. February 30th).
    pub fn to_naive(self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .ok_or_else(|| SlotError::InvalidDate(self.to_string()))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A recurring weekly window during which the provider accepts bookings.
///
/// Times are wall-clock times in the provider's timezone. A range whose
/// `start_time` is not before its `end_time` is tolerated and simply yields
/// no slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityRange {
    pub day_of_week: DayOfWeek,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl AvailabilityRange {
    pub const fn new(day_of_week: DayOfWeek, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            day_of_week,
            start_time,
            end_time,
        }
    }
}

/// Calendar-day bounds of a slot search: `start_date` inclusive, `end_date`
/// exclusive, both interpreted in the provider's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
}

impl DateWindow {
    pub const fn new(start_date: CalendarDate, end_date: CalendarDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Validate both bounds and return them as `(start, end)`.
    ///
    /// Only the individual dates are checked here; ordering of the bounds is
    /// the generator's concern.
    pub fn to_naive(self) -> Result<(NaiveDate, NaiveDate)> {
        Ok((self.start_date.to_naive()?, self.end_date.to_naive()?))
    }
}

/// A confirmed, paid commitment. Always blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// ISO 8601 start, either with an offset or as wall-clock time in `timezone`.
    pub start_datetime: String,
    /// IANA timezone the booking was made in.
    pub timezone: String,
    pub duration_minutes: i64,
}

/// A provisional hold, e.g. a checkout in progress. Blocks only while not voided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// ISO 8601 start, either with an offset or as wall-clock time in `timezone`.
    pub start_datetime: String,
    /// IANA timezone the offer was made in.
    pub timezone: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub voided: bool,
}

/// A bookable slot, expressed in the provider's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub date: CalendarDate,
    pub time: TimeOfDay,
    pub duration_mins: u32,
}
