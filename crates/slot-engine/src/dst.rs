//! DST transition policies for wall-clock times that do not exist.
//!
//! Availability templates are written in local wall-clock time. On a
//! spring-forward day some of those times are skipped by the clock (e.g. 02:30
//! in `America/New_York` on 2024-03-10). [`localize`] turns a local datetime
//! into an absolute instant and consults a [`DstPolicy`] for the gap case.
//! Ambiguous times on fall-back days always resolve to the earlier instant.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Longest gap searched by [`DstPolicy::ShiftForward`]. Whole skipped days
/// (e.g. `Pacific/Apia` on 2011-12-30) fit inside this bound.
const MAX_GAP_MINUTES: i64 = 48 * 60;

/// Policy for local times that fall in a DST gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DstPolicy {
    /// Drop the time entirely (a range anchored on it yields no slots that day).
    Skip,
    /// Move to the first valid local time after the gap (02:30 becomes 03:00).
    ShiftForward,
    /// Keep the wall-clock reading but use the offset in force before the gap
    /// (02:30 becomes 03:30).
    #[default]
    WallClock,
}

/// Resolve a local datetime in `tz` to an instant.
///
/// Returns `None` only when the time is in a gap and the policy is
/// [`DstPolicy::Skip`].
pub fn localize(naive: NaiveDateTime, tz: &Tz, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::WallClock => Some(with_offset_before_gap(naive, tz)),
            DstPolicy::ShiftForward => Some(first_valid_after(naive, tz)),
        },
    }
}

/// Interpret `naive` with the UTC offset in force shortly before it.
fn with_offset_before_gap(naive: NaiveDateTime, tz: &Tz) -> DateTime<Tz> {
    // A zone never changes offset twice within a day.
    let before = tz
        .offset_from_utc_datetime(&(naive - Duration::days(1)))
        .fix();
    let utc = naive - Duration::seconds(before.local_minus_utc() as i64);
    Utc.from_utc_datetime(&utc).with_timezone(tz)
}

fn first_valid_after(naive: NaiveDateTime, tz: &Tz) -> DateTime<Tz> {
    let mut probe = naive;
    for _ in 0..MAX_GAP_MINUTES {
        probe += Duration::minutes(1);
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt;
        }
    }
    with_offset_before_gap(naive, tz)
}
