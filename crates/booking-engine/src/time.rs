//! Time arithmetic -- wall-clock `HH:MM` strings to minute offsets and back.
//!
//! The engine is timezone-naive: every minute value is already local to the
//! service being booked. Dates are plain [`NaiveDate`]s.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// Number of minutes in a day. Valid minute offsets are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day, stored as minutes since midnight (0..=1439).
///
/// Serializes as the zero-padded `"HH:MM"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from a minute offset, failing with [`BookingError::Range`] outside one day.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(BookingError::Range(minutes));
        }
        Ok(TimeOfDay(minutes))
    }

    /// Build from an hour/minute pair.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(BookingError::Format(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay(hour * 60 + minute))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time_of_day(s).map(TimeOfDay)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = BookingError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

/// Parse `"HH:MM"` into minutes since midnight.
///
/// Exactly two digits on each side of the colon are required.
///
/// # Errors
/// Returns [`BookingError::Format`] when the shape is wrong or either field is
/// out of range (`HH` > 23, `MM` > 59).
pub fn parse_time_of_day(s: &str) -> Result<u32> {
    let format_err = || BookingError::Format(s.to_string());

    let (hh, mm) = s.split_once(':').ok_or_else(format_err)?;
    if hh.len() != 2 || mm.len() != 2 {
        return Err(format_err());
    }
    if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(format_err());
    }

    let hours: u32 = hh.parse().map_err(|_| format_err())?;
    let minutes: u32 = mm.parse().map_err(|_| format_err())?;
    if hours > 23 || minutes > 59 {
        return Err(format_err());
    }

    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as zero-padded `"HH:MM"`.
///
/// # Errors
/// Returns [`BookingError::Range`] when `minutes` is not in `0..=1439`.
pub fn format_minutes(minutes: u32) -> Result<String> {
    TimeOfDay::from_minutes(minutes).map(|t| t.to_string())
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| BookingError::InvalidDate(s.to_string()))
}

/// A half-open interval `[start, end)` within one day.
///
/// Used both for a service's daily business hours and for a single booked
/// appointment. No validation happens on construction: an interval with
/// `start >= end` is a caller error that yields empty (never panicking)
/// scheduling output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeInterval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        TimeInterval { start, end }
    }

    /// Build an interval from two `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(TimeInterval {
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    /// Length in minutes; zero for a malformed (`start >= end`) interval.
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
