//! Timezone lookups for the world clock list.
//!
//! The timezone database is consumed as an opaque lookup through `chrono-tz`.

use crate::format::display::format_clock_time;
use chrono::{DateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Unknown IANA timezone identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeZoneError {
    Unknown(String),
}

impl Display for TimeZoneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "unknown timezone: `{id}`"),
        }
    }
}

impl Error for TimeZoneError {}

/// Resolves an IANA identifier such as `Europe/Paris`.
pub fn resolve_zone(timezone: &str) -> Result<Tz, TimeZoneError> {
    timezone
        .trim()
        .parse::<Tz>()
        .map_err(|_| TimeZoneError::Unknown(timezone.to_string()))
}

/// Current wall-clock time in `timezone`, formatted like the main clock.
pub fn format_time_in_zone(
    timezone: &str,
    now: DateTime<Utc>,
    use_24_hour: bool,
) -> Result<String, TimeZoneError> {
    let zone = resolve_zone(timezone)?;
    let local = now.with_timezone(&zone);
    Ok(format_clock_time(
        local.hour(),
        local.minute(),
        local.second(),
        use_24_hour,
        true,
    ))
}

/// Whole-hour difference between `timezone` and `reference` at `now`.
///
/// Half-hour zones round to the nearest hour, ties toward positive infinity.
pub fn offset_hours_from<Z: TimeZone>(
    timezone: &str,
    now: DateTime<Utc>,
    reference: &Z,
) -> Result<i32, TimeZoneError> {
    let zone = resolve_zone(timezone)?;
    let target_seconds = now.with_timezone(&zone).offset().fix().local_minus_utc();
    let reference_seconds = now
        .with_timezone(reference)
        .offset()
        .fix()
        .local_minus_utc();
    let diff = f64::from(target_seconds - reference_seconds) / SECONDS_PER_HOUR;
    Ok((diff + 0.5).floor() as i32)
}

/// Offset label shown next to a world clock: `Same time`, `+5h`, `-3h`.
pub fn timezone_offset_label<Z: TimeZone>(
    timezone: &str,
    now: DateTime<Utc>,
    reference: &Z,
) -> Result<String, TimeZoneError> {
    let hours = offset_hours_from(timezone, now, reference)?;
    Ok(match hours {
        0 => "Same time".to_string(),
        positive if positive > 0 => format!("+{positive}h"),
        negative => format!("{negative}h"),
    })
}
