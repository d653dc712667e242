//! Timezone and timestamp parsing at the edge of the engine.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::dst::{localize, DstPolicy};
use crate::error::{Result, SlotError};

/// Offset-free layouts accepted for commitment start times.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse an IANA timezone name.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] if `name` is not in the tz database.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Parse a commitment start time into an absolute instant.
///
/// A value carrying an offset (`2023-05-01T10:00:00-04:00`, `...Z`) names an
/// instant directly. A value without one (`2023-05-01T10:00:00`) is
/// wall-clock time in `timezone`. The timezone is validated in both cases.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTimezone`] for an unknown zone and
/// [`SlotError::InvalidDatetime`] if `value` matches none of the accepted
/// layouts.
pub fn parse_instant(value: &str, timezone: &str) -> Result<DateTime<Utc>> {
    let tz = parse_timezone(timezone)?;
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%#z") {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| SlotError::InvalidDatetime(value.to_string()))?;

    localize(naive, &tz, DstPolicy::WallClock)
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| SlotError::InvalidDatetime(format!("{} in {}", value, timezone)))
}
