//! Common utilities for document generation.
//!
//! Shared helpers for date formatting, value coercion and file naming.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Display;

/// Canonical display format for every date drawn on the form.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

lazy_static! {
    static ref LEADING_YEAR: Regex = Regex::new(r"^\d{4}[-/]").unwrap();
    static ref TRAILING_YEAR: Regex = Regex::new(r"(^|\D)\d{4}$").unwrap();
    static ref TRAILING_SHORT_YEAR: Regex = Regex::new(r"\D\d{2}$").unwrap();
    /// Browser `Date.toString()` output, e.g.
    /// `Tue Mar 05 2024 00:00:00 GMT+0530 (India Standard Time)`.
    static ref JS_DATE_STRING: Regex = Regex::new(
        r"^([A-Za-z]{3} [A-Za-z]{3} \d{1,2} \d{4})(?: \d{2}:\d{2}(?::\d{2})?)?(?: GMT[+-]\d{4})?(?: \(.*\))?$"
    )
    .unwrap();
}

/// Year-first timestamps with a numeric offset, colon optional (`+0530`).
const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Layouts ending in a four-digit year. Numeric dates are day-first.
const YEAR_LAST_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

/// Format a date value as `DD-MM-YYYY`.
///
/// Timestamps keep the calendar date written in them; no timezone shift is
/// applied. Input that does not parse as a real calendar date is returned
/// unchanged, and absent or empty input yields an empty string.
pub fn format_display_date(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return String::new();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match parse_calendar_date(trimmed) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Parse the calendar date out of any of the accepted date layouts.
///
/// Each layout group is gated on the shape of its year, since chrono's
/// `%Y` and `%y` both accept a single digit.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc2822(value) {
        return Some(timestamp.date_naive());
    }

    if LEADING_YEAR.is_match(value) {
        return OFFSET_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(value, format).ok())
            .map(|timestamp| timestamp.date_naive())
            .or_else(|| {
                DATE_TIME_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                    .map(|timestamp| timestamp.date())
            })
            .or_else(|| first_date_match(value, YEAR_FIRST_FORMATS));
    }

    if let Some(captures) = JS_DATE_STRING.captures(value) {
        return NaiveDate::parse_from_str(&captures[1], "%a %b %d %Y").ok();
    }

    if TRAILING_YEAR.is_match(value) {
        first_date_match(value, YEAR_LAST_FORMATS)
    } else if TRAILING_SHORT_YEAR.is_match(value) {
        first_date_match(value, SHORT_YEAR_FORMATS)
    } else {
        None
    }
}

fn first_date_match(value: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Today's date as observed at the given UTC offset.
pub fn today_at(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Coerce an optional value to its display text; absent values become "".
pub fn display_text<T: Display + ?Sized>(value: Option<&T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Map the stored gender codes to their printed labels.
pub fn format_gender(value: Option<&str>) -> String {
    match value {
        Some("MALE") => "Male".to_string(),
        Some("FEMALE") => "Female".to_string(),
        Some("OTHER") => "Other".to_string(),
        other => display_text(other),
    }
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty() {
            result.push('-');
            last_dash = true;
        }
    }

    if result.is_empty() {
        return fallback.to_string();
    }

    result.trim_matches('-').to_string()
}
