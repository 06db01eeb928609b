//! Presentation formatting for event fields
//!
//! Neither function feeds back into the statistics; they only render the
//! `price` and `time` strings carried by each [`Event`](crate::Event).

use chrono::DateTime;

/// Rendered in place of a timestamp chrono cannot represent.
pub const INVALID_DATE: &str = "Invalid date";

/// Format unix seconds as `YYYY-MM-DD HH:MM UTC`.
pub fn format_utc_minutes(unix_seconds: i64) -> String {
    match DateTime::from_timestamp(unix_seconds, 0) {
        Some(dt) => format!("{} UTC", dt.format("%Y-%m-%d %H:%M")),
        None => INVALID_DATE.to_string(),
    }
}

/// Format a value as US dollars: `$1,234.56`, `-$0.50`.
pub fn format_usd(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "$∞" } else { "-$∞" }.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.001 rounds to $0.00, not -$0.00
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
