use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("empty timestamp")]
    Empty,
    #[error("timestamp '{0}' is not numeric")]
    NotNumeric(String),
    #[error("timestamp '{0}' has more than 19 digits")]
    TooLong(String),
    #[error("timestamp '{0}' is out of range")]
    OutOfRange(String),
}

/// Parse a numeric Unix timestamp, detecting precision by digit count.
///
/// Up to 10 digits are seconds, 11-13 milliseconds, 14-16 microseconds and
/// 17-19 nanoseconds. A value shorter than its precision boundary is padded
/// with trailing zeros, so `111111` reads as `1111110000` seconds.
pub fn parse_numeric_timestamp(ts_str: &str) -> Result<DateTime<Utc>, TimestampError> {
    let ts_str = ts_str.trim();
    if ts_str.is_empty() {
        return Err(TimestampError::Empty);
    }
    if !ts_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimestampError::NotNumeric(ts_str.to_string()));
    }

    let (boundary, units_per_second) = match ts_str.len() {
        0..=10 => (10, 1u64),
        11..=13 => (13, 1_000),
        14..=16 => (16, 1_000_000),
        17..=19 => (19, 1_000_000_000),
        _ => return Err(TimestampError::TooLong(ts_str.to_string())),
    };

    let out_of_range = || TimestampError::OutOfRange(ts_str.to_string());
    let raw: u64 = ts_str.parse().map_err(|_| out_of_range())?;
    let padding = 10u64.pow((boundary - ts_str.len()) as u32);
    let scaled = raw.checked_mul(padding).ok_or_else(out_of_range)?;

    let secs = i64::try_from(scaled / units_per_second).map_err(|_| out_of_range())?;
    let nanos = ((scaled % units_per_second) * (1_000_000_000 / units_per_second)) as u32;
    DateTime::from_timestamp(secs, nanos).ok_or_else(out_of_range)
}

/// Canonical RFC 3339 form in UTC, with fractional seconds only when non-zero
pub fn format_canonical(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
