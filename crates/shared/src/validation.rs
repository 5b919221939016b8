//! Common validation utilities.

use chrono_tz::Tz;
use validator::ValidationError;

/// Minutes in a day; a parsed time-of-day is always strictly below this.
const MINUTES_PER_DAY: u16 = 24 * 60;

/// Parses an `"HH:MM"` 24-hour time-of-day string into minutes since midnight.
///
/// Accepts `00:00` through `23:59`. Anything else (missing colon, out-of-range
/// hour or minute, extra characters) is rejected.
pub fn parse_time_of_day(value: &str) -> Result<u16, ValidationError> {
    let invalid = || {
        let mut err = ValidationError::new("time_of_day_format");
        err.message = Some("Time must be in HH:MM 24-hour format".into());
        err
    };

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: u16 = hours.parse().map_err(|_| invalid())?;
    let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    let total = hours * 60 + minutes;
    debug_assert!(total < MINUTES_PER_DAY);
    Ok(total)
}

/// Validates that a string is a well-formed `"HH:MM"` time-of-day.
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    parse_time_of_day(value).map(|_| ())
}

/// Parses an IANA timezone identifier (e.g. `"Europe/Bratislava"`).
pub fn parse_timezone(value: &str) -> Result<Tz, ValidationError> {
    value.parse::<Tz>().map_err(|_| {
        let mut err = ValidationError::new("timezone_unknown");
        err.message = Some("Unknown IANA timezone identifier".into());
        err
    })
}

/// Validates that a string is a known IANA timezone identifier.
pub fn validate_timezone(value: &str) -> Result<(), ValidationError> {
    parse_timezone(value).map(|_| ())
}

/// Validates a recurrence interval: recurring events repeat every N days, N >= 1.
pub fn validate_interval_days(interval: i32) -> Result<(), ValidationError> {
    if interval >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("interval_range");
        err.message = Some("Recurrence interval must be at least 1 day".into());
        Err(err)
    }
}
