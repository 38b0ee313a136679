//! Timestamp normalization.
//!
//! Producers send ISO-8601 strings, epoch seconds or epoch milliseconds with
//! no unit marker. Numbers whose magnitude exceeds 10^12 are taken as
//! milliseconds, everything else as seconds. A value in some other unit will
//! be misread; the threshold is a heuristic and is kept as-is.

use crate::services::fields::{as_number, FieldAliases};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Magnitude above which a numeric timestamp is read as milliseconds.
pub const MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize a raw timestamp value to epoch milliseconds.
pub fn normalize(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => normalize_str(s),
        Value::Number(_) => as_number(value).and_then(normalize_number),
        _ => None,
    }
}

/// Normalize a textual timestamp: date first, then numeric.
pub fn normalize_str(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_date(text).or_else(|| text.parse::<f64>().ok().and_then(normalize_number))
}

/// Normalize a numeric timestamp of unknown unit.
pub fn normalize_number(n: f64) -> Option<i64> {
    if !n.is_finite() {
        return None;
    }
    let millis = if n.abs() > MILLIS_THRESHOLD { n } else { n * 1000.0 };
    Some(millis.round() as i64)
}

/// First alias whose value normalizes to a timestamp.
///
/// Unlike numeric fields, an unparseable timestamp does not stop the search:
/// a later alias with a usable value still wins.
pub fn resolve(record: &Value, aliases: &FieldAliases) -> Option<i64> {
    aliases
        .keys()
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(normalize)
}

fn parse_date(text: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fields::aliases;
    use serde_json::json;

    #[test]
    fn test_seconds_and_millis_same_instant() {
        assert_eq!(normalize(&json!(1_700_000_000)), Some(1_700_000_000_000));
        assert_eq!(normalize(&json!(1_700_000_000_000_i64)), Some(1_700_000_000_000));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly 10^12 is not greater than the threshold, so it is seconds.
        assert_eq!(normalize_number(1e12), Some(1_000_000_000_000_000));
    }

    #[test]
    fn test_iso_strings() {
        assert_eq!(normalize(&json!("2023-11-14T22:13:20Z")), Some(1_700_000_000_000));
        assert_eq!(
            normalize(&json!("2023-11-14T23:13:20+01:00")),
            Some(1_700_000_000_000)
        );
        assert_eq!(normalize(&json!("2023-11-14T22:13:20")), Some(1_700_000_000_000));
        assert_eq!(normalize(&json!("2023-11-14")), Some(1_699_920_000_000));
    }

    #[test]
    fn test_numeric_string_falls_through() {
        assert_eq!(normalize(&json!("1700000000")), Some(1_700_000_000_000));
        assert_eq!(normalize(&json!("1700000000000")), Some(1_700_000_000_000));
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(normalize(&json!(1_700_000_000.25)), Some(1_700_000_000_250));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(normalize(&json!("yesterday")), None);
        assert_eq!(normalize(&json!("")), None);
        assert_eq!(normalize(&json!(true)), None);
        assert_eq!(normalize(&json!(null)), None);
        assert_eq!(normalize(&json!({"ts": 1})), None);
    }

    #[test]
    fn test_resolve_skips_bad_alias() {
        let record = json!({"time": "garbage", "created_time": "2023-11-14T22:13:20Z"});
        assert_eq!(resolve(&record, &aliases::TIMESTAMP), Some(1_700_000_000_000));
    }
}
