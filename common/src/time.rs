//! Time utilities and constants for FXBoard.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::time::Duration;

/// Format used for report timestamps (`2026-10-16 09:30:00`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Network timing constants.
pub mod constants {
    use super::Duration;

    /// Fallback rate API timeout (5 seconds).
    pub fn fallback_timeout() -> Duration {
        Duration::from_secs(5)
    }

    /// Per-bank page scrape timeout (10 seconds).
    pub fn scrape_timeout() -> Duration {
        Duration::from_secs(10)
    }
}

/// Report timestamp in server local time.
pub type Timestamp = DateTime<Local>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Local::now()
}

/// Render a timestamp the way rate reports carry it.
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a report timestamp back into a naive date-time.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()
}
