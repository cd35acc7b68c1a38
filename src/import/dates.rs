//! Date Normalizer
//!
//! Converts the date representations found in uploaded spreadsheets into
//! ISO `YYYY-MM-DD` strings. Start dates are optional, so anything that
//! cannot be read as a date normalizes to the empty string instead of
//! producing an error; the validator decides what blocks submission.

use super::Cell;
use crate::employee::EmployeeRecord;
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Largest serial the 1900 date system can express
const MAX_SERIAL: i64 = 2_958_465;

/// Serials above this carry the leap-year correction
const LEAP_BUG_SERIAL: i64 = 59;

/// Something that may hold a date
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    Text(&'a str),
    Serial(f64),
    Empty,
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        DateInput::Text(s)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(s: &'a String) -> Self {
        DateInput::Text(s.as_str())
    }
}

impl From<f64> for DateInput<'_> {
    fn from(v: f64) -> Self {
        DateInput::Serial(v)
    }
}

impl From<i64> for DateInput<'_> {
    fn from(v: i64) -> Self {
        DateInput::Serial(v as f64)
    }
}

impl From<i32> for DateInput<'_> {
    fn from(v: i32) -> Self {
        DateInput::Serial(v as f64)
    }
}

impl From<u32> for DateInput<'_> {
    fn from(v: u32) -> Self {
        DateInput::Serial(v as f64)
    }
}

impl<'a> From<&'a Cell> for DateInput<'a> {
    fn from(cell: &'a Cell) -> Self {
        match cell {
            Cell::Empty => DateInput::Empty,
            Cell::Text(s) => DateInput::Text(s.as_str()),
            Cell::Number(n) => DateInput::Serial(*n),
        }
    }
}

struct Patterns {
    strict_iso: Regex,
    loose_iso: Regex,
    us_slash: Regex,
    us_dash: Regex,
    numeric: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        strict_iso: Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"),
        loose_iso: Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid regex"),
        us_slash: Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"),
        us_dash: Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").expect("valid regex"),
        numeric: Regex::new(r"^\d+(\.\d+)?$").expect("valid regex"),
    })
}

/// Normalize a date to `YYYY-MM-DD`, or `""` when there is no usable date
///
/// # Example
///
/// ```
/// use roster::import::normalize;
///
/// assert_eq!(normalize("2024-01-15"), "2024-01-15");
/// assert_eq!(normalize("1/5/2024"), "2024-01-05");
/// assert_eq!(normalize(45306), "2024-01-14");
/// assert_eq!(normalize("not a date"), "");
/// ```
pub fn normalize<'a>(input: impl Into<DateInput<'a>>) -> String {
    match input.into() {
        DateInput::Empty => String::new(),
        DateInput::Serial(serial) => serial_to_iso(serial),
        DateInput::Text(text) => normalize_text(text),
    }
}

fn normalize_text(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let p = patterns();

    if p.strict_iso.is_match(text) {
        return text.to_string();
    }

    if let Some(caps) = p.loose_iso.captures(text) {
        return ymd_to_iso(&caps[1], &caps[2], &caps[3]);
    }

    // Month-first, as spreadsheets exported with US locale write them
    if let Some(caps) = p
        .us_slash
        .captures(text)
        .or_else(|| p.us_dash.captures(text))
    {
        return ymd_to_iso(&caps[3], &caps[1], &caps[2]);
    }

    if p.numeric.is_match(text) {
        if let Ok(serial) = text.parse::<f64>() {
            return serial_to_iso(serial);
        }
    }

    String::new()
}

fn ymd_to_iso(year: &str, month: &str, day: &str) -> String {
    let parsed = (year.parse(), month.parse(), day.parse());
    match parsed {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d)
            .map(format_iso)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Convert a spreadsheet serial date (1900 date system) to `YYYY-MM-DD`
///
/// Days are counted from 1899-12-30. The 1900 system treats 1900 as a leap
/// year, so every serial above 59 is moved back one day, unconditionally:
/// 1 is 1899-12-31, 61 is 1900-02-28 and 45306 is 2024-01-14. Any
/// time-of-day fraction is dropped.
pub fn serial_to_iso(serial: f64) -> String {
    if !serial.is_finite() || serial < 1.0 {
        return String::new();
    }

    let days = serial.floor() as i64;
    if days > MAX_SERIAL {
        return String::new();
    }

    let offset = if days > LEAP_BUG_SERIAL { days - 1 } else { days };

    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(offset)))
        .map(format_iso)
        .unwrap_or_default()
}

fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// True when `s` is a strict `YYYY-MM-DD` string naming a real date
pub fn is_iso_date(s: &str) -> bool {
    patterns().strict_iso.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Re-normalize the start date of every record in place
///
/// Records hand-edited after parsing may hold any of the accepted shapes
/// again, so this runs once more right before transmission.
pub fn batch_normalize(records: &mut [EmployeeRecord]) {
    for record in records.iter_mut() {
        if record.start_date.is_empty() {
            continue;
        }
        let normalized = normalize(&record.start_date);
        if normalized != record.start_date {
            tracing::debug!(
                from = %record.start_date,
                to = %normalized,
                "Normalized start date"
            );
            record.start_date = normalized;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_iso_is_unchanged() {
        for s in ["2024-01-15", "1999-12-31", "2000-02-29"] {
            assert_eq!(normalize(s), s);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(&Cell::Empty), "");
    }

    #[test]
    fn test_date_shaped_strings() {
        assert_eq!(normalize("2024-1-5"), "2024-01-05");
        assert_eq!(normalize("1/15/2024"), "2024-01-15");
        assert_eq!(normalize("12/31/2023"), "2023-12-31");
        assert_eq!(normalize("01-15-2024"), "2024-01-15");
        assert_eq!(normalize(" 3/7/2022 "), "2022-03-07");
    }

    #[test]
    fn test_impossible_date_shapes() {
        assert_eq!(normalize("13/45/2024"), "");
        assert_eq!(normalize("2023-2-30"), "");
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(normalize(1), "1899-12-31");
        assert_eq!(normalize(59), "1900-02-27");
        assert_eq!(normalize(60), "1900-02-27");
        assert_eq!(normalize(61), "1900-02-28");
        assert_eq!(normalize(62), "1900-03-01");
        assert_eq!(normalize(45306), "2024-01-14");
        assert_eq!(normalize(45493), "2024-07-19");
        assert_eq!(normalize(45306.75), "2024-01-14");
    }

    #[test]
    fn test_numeric_strings_are_serials() {
        assert_eq!(normalize("45306"), "2024-01-14");
        assert_eq!(normalize("45306.5"), "2024-01-14");
        assert_eq!(normalize(&Cell::Number(45293.0)), "2024-01-01");
    }

    #[test]
    fn test_out_of_range_serials() {
        assert_eq!(normalize(0), "");
        assert_eq!(normalize(-5), "");
        assert_eq!(normalize(0.5), "");
        assert_eq!(normalize(f64::NAN), "");
        assert_eq!(normalize(10_000_000), "");
    }

    #[test]
    fn test_garbage_strings() {
        for s in ["hello", "next monday", "2024/13", "-12", "12abc"] {
            assert_eq!(normalize(s), "", "input {:?}", s);
        }
    }

    #[test]
    fn test_is_iso_date() {
        assert!(is_iso_date("2024-02-29"));
        assert!(!is_iso_date("2023-02-29"));
        assert!(!is_iso_date("2024-1-5"));
        assert!(!is_iso_date("01/05/2024"));
    }

    #[test]
    fn test_batch_normalize() {
        let mut records = vec![
            EmployeeRecord::new("A", "B", "a@b.co").start_date("1/15/2024"),
            EmployeeRecord::new("C", "D", "c@d.co"),
            EmployeeRecord::new("E", "F", "e@f.co").start_date("45306"),
        ];

        batch_normalize(&mut records);

        assert_eq!(records[0].start_date, "2024-01-15");
        assert_eq!(records[1].start_date, "");
        assert_eq!(records[2].start_date, "2024-01-14");
    }
}
