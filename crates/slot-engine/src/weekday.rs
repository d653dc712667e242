//! Weekday labels used by recurring availability templates.
//!
//! Templates name their days with a closed set of seven labels. Calendar
//! arithmetic works in terms of [`chrono::Weekday`]; [`weekday_label`] bridges
//! the two so that a mistyped label fails at construction time instead of
//! silently matching nothing.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A weekday label as stored on an availability range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All seven labels, Monday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Convert an ISO 8601 weekday number (1 = Monday … 7 = Sunday).
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidWeekday`] for numbers outside `1..=7`.
    pub fn from_iso(iso_weekday: u32) -> Result<Self> {
        match iso_weekday {
            1..=7 => Ok(Self::ALL[(iso_weekday - 1) as usize]),
            other => Err(SlotError::InvalidWeekday(format!(
                "ISO weekday must be 1..=7, got {}",
                other
            ))),
        }
    }

    /// The ISO 8601 weekday number of this label.
    pub fn iso_number(self) -> u32 {
        self as u32 + 1
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        weekday_label(weekday)
    }
}

/// Map a calendar weekday onto its template label.
pub fn weekday_label(weekday: Weekday) -> DayOfWeek {
    match weekday {
        Weekday::Mon => DayOfWeek::Monday,
        Weekday::Tue => DayOfWeek::Tuesday,
        Weekday::Wed => DayOfWeek::Wednesday,
        Weekday::Thu => DayOfWeek::Thursday,
        Weekday::Fri => DayOfWeek::Friday,
        Weekday::Sat => DayOfWeek::Saturday,
        Weekday::Sun => DayOfWeek::Sunday,
    }
}
