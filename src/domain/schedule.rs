//! Canonical forms for event dates and times.
//!
//! Dates are stored as ISO calendar dates (`YYYY-MM-DD`) and times as
//! zero-padded 24-hour `HH:MM` strings, whatever shape the organizer typed.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::error::AppError;

/// Date-only shapes accepted besides RFC 3339 / RFC 2822.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%B %d %Y", "%d %B %Y"];

/// Zone-less date-time shapes; interpreted as UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-time shapes with a compact offset (`+0100`), which RFC 3339 rejects.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

#[allow(clippy::expect_used)]
static TWENTY_FOUR_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("valid regex"));

#[allow(clippy::expect_used)]
static TWELVE_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):([0-5]\d)\s*(am|pm)$").expect("valid regex"));

/// Parses `input` as a calendar date or date-time and returns its date as
/// `YYYY-MM-DD`.
///
/// Offsets are applied before the date is taken, so
/// `2026-02-14T23:30:00-05:00` lands on `2026-02-15`. Values without an
/// offset are read as UTC.
///
/// # Errors
///
/// Returns [`AppError::InvalidDate`] if no accepted shape matches.
pub fn normalize_date(input: &str) -> Result<String, AppError> {
    parse_calendar_date(input.trim())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| AppError::InvalidDate(input.to_string()))
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Normalizes a time of day to 24-hour `HH:MM`.
///
/// Accepts `H:MM`/`HH:MM` in 24-hour form, or `H:MM am|pm` in 12-hour
/// form (case-insensitive, optional space before the period).
///
/// # Errors
///
/// Returns [`AppError::InvalidHour`] for a 12-hour value whose hour is not
/// 1–12, and [`AppError::InvalidTime`] for anything else that matches
/// neither form.
pub fn normalize_time(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim().to_lowercase();

    if let Some(caps) = TWENTY_FOUR_HOUR.captures(&trimmed) {
        let (Some(hour), Some(minute)) = (caps.get(1), caps.get(2)) else {
            return Err(AppError::InvalidTime(input.to_string()));
        };
        return Ok(format!("{:0>2}:{}", hour.as_str(), minute.as_str()));
    }

    if let Some(caps) = TWELVE_HOUR.captures(&trimmed) {
        let (Some(hour), Some(minute), Some(period)) = (caps.get(1), caps.get(2), caps.get(3))
        else {
            return Err(AppError::InvalidTime(input.to_string()));
        };
        let hour: u32 = hour
            .as_str()
            .parse()
            .map_err(|_| AppError::InvalidTime(input.to_string()))?;
        if !(1..=12).contains(&hour) {
            return Err(AppError::InvalidHour(input.to_string()));
        }
        let hour = match (period.as_str(), hour) {
            ("am", 12) => 0,
            ("pm", h) if h != 12 => h + 12,
            (_, h) => h,
        };
        return Ok(format!("{hour:02}:{}", minute.as_str()));
    }

    Err(AppError::InvalidTime(input.to_string()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn time(input: &str) -> String {
        let Ok(out) = normalize_time(input) else {
            panic!("{input:?} should normalize");
        };
        out
    }

    fn date(input: &str) -> String {
        let Ok(out) = normalize_date(input) else {
            panic!("{input:?} should normalize");
        };
        out
    }

    #[test]
    fn twenty_four_hour_is_zero_padded() {
        assert_eq!(time("9:30"), "09:30");
        assert_eq!(time("09:30"), "09:30");
        assert_eq!(time("0:00"), "00:00");
        assert_eq!(time(" 23:59 "), "23:59");
    }

    #[test]
    fn twelve_hour_converts() {
        assert_eq!(time("9:30 pm"), "21:30");
        assert_eq!(time("9:30 am"), "09:30");
        assert_eq!(time("12:00 am"), "00:00");
        assert_eq!(time("12:00 pm"), "12:00");
        assert_eq!(time("11:45PM"), "23:45");
        assert_eq!(time("1:05 Am"), "01:05");
    }

    #[test]
    fn out_of_range_hours_fail() {
        assert!(matches!(normalize_time("25:00"), Err(AppError::InvalidTime(_))));
        assert!(matches!(normalize_time("24:00"), Err(AppError::InvalidTime(_))));
        assert!(matches!(normalize_time("13:00 pm"), Err(AppError::InvalidHour(_))));
        assert!(matches!(normalize_time("0:30 am"), Err(AppError::InvalidHour(_))));
    }

    #[test]
    fn malformed_times_fail() {
        for bad in ["", "noon", "9", "9:5", "9:60", "09:30:00", "9:30 p.m.", "21h30"] {
            assert!(
                matches!(normalize_time(bad), Err(AppError::InvalidTime(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn date_time_keeps_only_the_date() {
        assert_eq!(date("2026-02-14T10:00:00Z"), "2026-02-14");
        assert_eq!(date("2026-02-14T10:00:00.250Z"), "2026-02-14");
        assert_eq!(date("2026-02-14 18:30"), "2026-02-14");
    }

    #[test]
    fn offsets_are_converted_to_utc_first() {
        assert_eq!(date("2026-02-14T23:30:00-05:00"), "2026-02-15");
        assert_eq!(date("2026-02-15T01:00:00+03:00"), "2026-02-14");
    }

    #[test]
    fn compact_offsets_are_accepted() {
        assert_eq!(date("2026-02-14T10:00:00+0100"), "2026-02-14");
        assert_eq!(date("2026-02-14T23:30:00-0500"), "2026-02-15");
        assert_eq!(date("2026-02-14T10:00+0000"), "2026-02-14");
    }

    #[test]
    fn other_date_shapes() {
        assert_eq!(date("2026-02-14"), "2026-02-14");
        assert_eq!(date("2026/02/14"), "2026-02-14");
        assert_eq!(date("February 14, 2026"), "2026-02-14");
        assert_eq!(date("Sat, 14 Feb 2026 10:00:00 +0000"), "2026-02-14");
    }

    #[test]
    fn unparseable_dates_fail() {
        for bad in ["not-a-date", "", "2026-02-30", "14/02/2026x", "2026-13-01"] {
            assert!(
                matches!(normalize_date(bad), Err(AppError::InvalidDate(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
