//! ISO date handling for `lastUpdated` and post dates.
//!
//! Records keep their dates as strings and sort them lexicographically, which
//! only matches chronological order for zero-padded `YYYY-MM-DD`.

use chrono::{Datelike, Local, NaiveDate};

/// Parse a strict, zero-padded `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
    {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[inline]
pub fn is_iso_date(s: &str) -> bool {
    parse_iso_date(s).is_some()
}

/// RFC 2822 timestamp at midnight UTC, for RSS `pubDate`.
pub fn to_rfc2822(s: &str) -> Option<String> {
    let date = parse_iso_date(s)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().to_rfc2822())
}

/// Human-readable form ("July 21, 2024"); unparseable input is returned as-is.
pub fn display(s: &str) -> String {
    match parse_iso_date(s) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => s.to_owned(),
    }
}

pub fn current_year() -> i32 {
    Local::now().year()
}

/// Wall-clock time as `HH:MM:SS`, for watch status lines.
pub fn clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
