//! Display formatting for date and time strings coming from the API.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

/// What `format_date` renders for input it cannot parse.
pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Render a date in the Argentine short format, `D/M/YYYY` with no zero
/// padding (`"2024-03-05"` becomes `"5/3/2024"`).
///
/// Empty or missing input gives an empty string. Timestamps carrying an
/// offset are shown in local time; naive ones are taken as they are.
pub fn format_date(input: Option<&str>) -> String {
    let Some(raw) = input.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    match parse_date(raw.trim()) {
        Some(date) => format!("{}/{}/{}", date.day(), date.month(), date.year()),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Cut an `HH:MM:SS` string down to `HH:MM`.
///
/// No parsing happens: any input keeps its first five characters, shorter
/// input comes back unchanged.
pub fn format_time(input: Option<&str>) -> String {
    match input {
        Some(raw) if !raw.is_empty() => raw.chars().take(5).collect(),
        _ => String::new(),
    }
}
