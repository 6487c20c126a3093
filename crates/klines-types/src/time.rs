//! Millisecond timestamp helpers.

use chrono::{DateTime, Utc};

/// Converts milliseconds since the Unix epoch to a UTC datetime.
///
/// Returns `None` if the value is outside chrono's supported range.
#[must_use]
pub fn ms_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Converts a UTC datetime to milliseconds since the Unix epoch.
#[must_use]
pub fn datetime_to_ms(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Formats a millisecond timestamp as RFC 3339 with millisecond precision.
///
/// Out-of-range values fall back to the raw number.
#[must_use]
pub fn format_ms(ms: i64) -> String {
    ms_to_datetime(ms).map_or_else(
        || ms.to_string(),
        |dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    )
}
