//! Time formatting for API responses

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::Serializer;

/// Timezone for the health check's human-readable time
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// Human-readable wall-clock time in `tz`, 12-hour clock.
///
/// e.g. `Friday, 16 October 2026 at 03:04:05 pm`
pub fn display_time(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz)
        .format("%A, %-d %B %Y at %I:%M:%S %P")
        .to_string()
}

/// RFC 3339 in UTC with millisecond precision and a `Z` suffix.
pub fn json_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `serialize_with` adapter for [`json_timestamp`]
pub fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&json_timestamp(ts))
}
