//! Calendar-day iteration over a half-open date window.
//!
//! Days are stepped as calendar dates, never as 24-hour timestamp increments,
//! so 23- and 25-hour DST days cannot shift the walk by one.

use std::iter::FusedIterator;

use chrono::NaiveDate;

/// Iterator over every calendar day in `[start, end)`, ascending.
#[derive(Debug, Clone)]
pub struct CalendarDays {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for CalendarDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let day = self.next.filter(|day| *day < self.end)?;
        self.next = day.succ_opt();
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|day| (self.end - day).num_days().max(0) as usize)
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CalendarDays {}
impl FusedIterator for CalendarDays {}

/// Walk the calendar days of `[start, end)`.
///
/// A zero-length or inverted window yields nothing.
pub fn walk_days(start: NaiveDate, end: NaiveDate) -> CalendarDays {
    CalendarDays {
        next: Some(start),
        end,
    }
}

/// Number of calendar days in `[start, end)`, zero when inverted.
pub fn window_len(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(0)
}
