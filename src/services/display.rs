//! Display formatting for money, ratios and timestamps.

use chrono::{Local, TimeZone};

/// Shown for timestamps that could not be resolved.
pub const UNKNOWN: &str = "—";

/// Format dollars as `$1,234.56` / `-$12.00`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }

    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// Format an optional amount, with a zero placeholder when absent.
pub fn format_money(value: Option<f64>) -> String {
    format_currency(value.unwrap_or(0.0))
}

/// Format a signed amount with an explicit `+` for gains.
pub fn format_signed(value: f64) -> String {
    let formatted = format_currency(value);
    if formatted.starts_with('-') || formatted == "$0.00" {
        formatted
    } else {
        format!("+{}", formatted)
    }
}

/// Format a ratio (0.1234) as a percentage (12.34%).
pub fn format_percent(ratio: f64) -> String {
    if !ratio.is_finite() {
        return "0.00%".to_string();
    }
    let pct = ratio * 100.0;
    // Avoid printing -0.00%.
    let pct = if pct.abs() < 0.005 { 0.0 } else { pct };
    format!("{:.2}%", pct)
}

/// Format epoch milliseconds in local time.
pub fn format_timestamp(ts_ms: Option<i64>) -> String {
    format_timestamp_in(ts_ms, &Local)
}

/// Format epoch milliseconds in the given time zone.
pub fn format_timestamp_in<Tz>(ts_ms: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ts_ms
        .and_then(|ms| tz.timestamp_millis_opt(ms).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn group_thousands(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push(n % 1000);
        n /= 1000;
    }
    let mut out = groups.pop().map(|g| g.to_string()).unwrap_or_default();
    for group in groups.iter().rev() {
        out.push_str(&format!(",{:03}", group));
    }
    out
}
