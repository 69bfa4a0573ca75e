//! Timezone normalization between calendar-local wall-clock times and the UTC timeline.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::event::TimePoint;

/// Parse an IANA timezone name (e.g., "Europe/Paris").
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// Express `instant` in `zone`.
pub fn to_local(instant: TimePoint, zone: Tz) -> DateTime<Tz> {
    instant.with_timezone(&zone)
}

/// Resolve a wall-clock time in `zone` to an instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times inside a
/// DST gap do not exist and return `None`.
pub fn localize(naive: NaiveDateTime, zone: Tz) -> Option<TimePoint> {
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
