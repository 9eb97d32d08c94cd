use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

/// Normalized value for entries whose recorded timestamp could not be parsed.
/// Sorts before every real timestamp, so malformed entries collect at the
/// start of the timeline.
pub const UNPARSEABLE_MS: i64 = i64::MIN;

/// Normalize a recorded timestamp to comparable epoch milliseconds.
///
/// Numbers are taken as epoch milliseconds (fractions truncated). Strings are
/// parsed as RFC 3339, then as naive `YYYY-MM-DDTHH:MM:SS[.f]` datetimes
/// interpreted as UTC. Anything else yields [`UNPARSEABLE_MS`].
pub fn normalize_timestamp(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => {
            if let Some(ms) = n.as_i64() {
                ms
            } else if let Some(f) = n.as_f64()
                && f.is_finite()
            {
                f as i64
            } else {
                UNPARSEABLE_MS
            }
        }
        Value::String(s) => parse_datetime_str(s).unwrap_or(UNPARSEABLE_MS),
        _ => UNPARSEABLE_MS,
    }
}

fn parse_datetime_str(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    // Naive datetimes (no zone designator) are taken as UTC
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    None
}

/// Wall-clock `HH:MM:SS` for timeline rows. Unparseable timestamps render as
/// a placeholder instead of a bogus epoch date.
pub fn format_clock_time(ms: i64) -> String {
    if ms == UNPARSEABLE_MS {
        return "--:--:--".to_string();
    }
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Full UTC timestamp for the detail pane.
pub fn format_full_time(ms: i64) -> String {
    if ms == UNPARSEABLE_MS {
        return "(unparseable timestamp)".to_string();
    }
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        None => "(unparseable timestamp)".to_string(),
    }
}
