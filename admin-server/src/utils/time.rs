//! Time helpers
//!
//! Schedule and holiday settings carry wall-clock strings ("HH:MM") and
//! calendar dates ("YYYY-MM-DD"); parsing is centralized here so the
//! validator and handlers agree on the formats. Storage timestamps are
//! `i64` Unix millis throughout.

use chrono::{NaiveDate, NaiveTime, Timelike};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Parse a wall-clock string ("HH:MM") into minutes since midnight
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some(time.hour() * 60 + time.minute())
}

/// Parse a calendar date string ("YYYY-MM-DD")
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Shift length in minutes, `None` unless `start < end` within one day
pub fn shift_duration_minutes(start: &str, end: &str) -> Option<u32> {
    let start = parse_hhmm(start)?;
    let end = parse_hhmm(end)?;
    if start < end { Some(end - start) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wall_clock() {
        assert_eq!(parse_hhmm("09:00"), Some(540));
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:59"), Some(23 * 60 + 59));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("9am"), None);
    }

    #[test]
    fn shift_duration_requires_ordering() {
        assert_eq!(shift_duration_minutes("09:00", "18:00"), Some(540));
        assert_eq!(shift_duration_minutes("18:00", "09:00"), None);
        assert_eq!(shift_duration_minutes("09:00", "09:00"), None);
    }

    #[test]
    fn parses_dates() {
        assert!(parse_date("2025-12-25").is_some());
        assert!(parse_date("25/12/2025").is_none());
        assert!(parse_date("2025-02-30").is_none());
    }
}
