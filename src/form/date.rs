use std::fmt::Write;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

pub const STORAGE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &[STORAGE_FORMAT, "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parses a stored value into a calendar date.
///
/// Strings are tried as plain dates, RFC 3339 timestamps and naive date-times;
/// integers are unix timestamps in milliseconds.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(text) => parse_date_str(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|instant| instant.date_naive()),
        _ => None,
    }
}

pub fn parse_date_str(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .map(|stamp| stamp.date())
            })
        })
}

/// Normalizes a stored value for seeding: parseable values become
/// `YYYY-MM-DD` strings, everything else is left untouched.
pub fn normalize(value: &Value) -> Value {
    match parse_date(value) {
        Some(date) => Value::String(format_date(date, STORAGE_FORMAT)),
        None => value.clone(),
    }
}

pub fn format_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Formats with a caller-supplied pattern; invalid patterns yield `None`.
pub fn try_format_date(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

pub fn step(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let delta = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(delta)
    } else {
        date.checked_sub_days(delta)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_common_representations() {
        assert_eq!(parse_date(&json!("2024-03-05")), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&json!("2024-03-05T10:00:00Z")), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&json!("05.03.2024")), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&json!("2024-03-05 08:30:00")), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(&json!(0)), Some(ymd(1970, 1, 1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(&json!("tomorrow-ish")), None);
        assert_eq!(parse_date(&json!("")), None);
        assert_eq!(parse_date(&json!(true)), None);
        assert_eq!(parse_date(&Value::Null), None);
    }

    #[test]
    fn normalize_keeps_unparseable_values() {
        assert_eq!(normalize(&json!("2024-03-05T10:00:00Z")), json!("2024-03-05"));
        assert_eq!(normalize(&json!("soon")), json!("soon"));
    }

    #[test]
    fn steps_across_month_boundaries() {
        assert_eq!(step(ymd(2024, 2, 28), 2), Some(ymd(2024, 3, 1)));
        assert_eq!(step(ymd(2024, 3, 1), -1), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn display_formats_are_checked() {
        assert_eq!(
            try_format_date(ymd(2024, 3, 5), "%d %b %Y").as_deref(),
            Some("05 Mar 2024")
        );
        assert_eq!(try_format_date(ymd(2024, 3, 5), "%Q"), None);
    }
}
