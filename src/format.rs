//! Display Formatting
//!
//! Currency, compact numbers and dates as the UI shows them (vi-VN conventions).

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Digits grouped with dots: 1234567 -> "1.234.567"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Whole dong, e.g. "1.500.000 ₫"
pub fn currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{} ₫", sign, group_thousands(rounded.abs() as u64))
}

/// Short form for chart axes and column totals: 1,5 Tr, 2,3 T
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    let (scaled, suffix) = if abs >= 1e9 {
        (abs / 1e9, " T")
    } else if abs >= 1e6 {
        (abs / 1e6, " Tr")
    } else if abs >= 1e3 {
        (abs / 1e3, " N")
    } else {
        return format!("{}{}", sign, abs.round() as u64);
    };
    let text = format!("{:.1}", scaled);
    let text = text.strip_suffix(".0").unwrap_or(&text).replace('.', ",");
    format!("{}{}{}", sign, text, suffix)
}

pub fn percent(value: f64) -> String {
    format!("{}%", format!("{:.1}", value).replace('.', ","))
}

pub fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn datetime(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Day and time without the year, for activity and task lists
pub fn short_datetime(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.with_timezone(&Local).format("%d/%m %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `<input type="datetime-local">` value (local time) to RFC 3339
pub fn datetime_local_to_rfc3339(value: &str) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(local.with_timezone(&Utc).to_rfc3339())
}

pub fn is_overdue(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    due.is_some_and(|d| d < now)
}
