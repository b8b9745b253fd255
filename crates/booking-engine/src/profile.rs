//! Per-service availability profile.
//!
//! A profile is a read-only snapshot supplied by the persistence collaborator.
//! The engine never mutates it; a fresh one is fetched whenever the selected
//! service changes.
//!
//! The JSON shape matches what the persistence layer stores:
//!
//! ```json
//! {
//!   "business_hours": { "start": "09:00", "end": "18:00" },
//!   "closed_days": [0],
//!   "special_closures": ["2025-07-19"],
//!   "booked_slots": { "2025-07-15": [{ "start": "09:00", "end": "09:45" }] }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time::TimeInterval;

/// Weekday number with `0 = Sunday .. 6 = Saturday`.
pub fn weekday_of(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Opaque service identifier, as used by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        ServiceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(s: &str) -> Self {
        ServiceId(s.to_string())
    }
}

/// Business hours, closures, and existing bookings for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityProfile {
    /// Daily operating window, identical on every open day.
    pub business_hours: TimeInterval,
    /// Weekdays the service never opens (`0 = Sunday`).
    #[serde(rename = "closed_days", default)]
    pub closed_weekdays: BTreeSet<u8>,
    /// One-off closed dates such as holidays.
    #[serde(default)]
    pub special_closures: BTreeSet<NaiveDate>,
    /// Existing appointments keyed by date. Order within a day is irrelevant.
    #[serde(rename = "booked_slots", default)]
    pub booked_intervals: BTreeMap<NaiveDate, Vec<TimeInterval>>,
}

impl AvailabilityProfile {
    /// A profile open every day during `business_hours`, with no bookings.
    pub fn new(business_hours: TimeInterval) -> Self {
        AvailabilityProfile {
            business_hours,
            closed_weekdays: BTreeSet::new(),
            special_closures: BTreeSet::new(),
            booked_intervals: BTreeMap::new(),
        }
    }

    pub fn with_closed_weekdays(mut self, weekdays: impl IntoIterator<Item = u8>) -> Self {
        self.closed_weekdays.extend(weekdays);
        self
    }

    pub fn with_special_closure(mut self, date: NaiveDate) -> Self {
        self.special_closures.insert(date);
        self
    }

    pub fn with_booking(mut self, date: NaiveDate, interval: TimeInterval) -> Self {
        self.booked_intervals.entry(date).or_default().push(interval);
        self
    }

    pub fn is_closed_on_weekday(&self, weekday: u8) -> bool {
        self.closed_weekdays.contains(&weekday)
    }

    pub fn special_closures_contains(&self, date: NaiveDate) -> bool {
        self.special_closures.contains(&date)
    }

    /// Bookings on `date`; empty when the date has no entry.
    pub fn booked_intervals_for(&self, date: NaiveDate) -> &[TimeInterval] {
        self.booked_intervals
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Everything the selection flow needs about one service: its default booking
/// duration and its availability snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProfile {
    pub service_id: ServiceId,
    /// Default appointment length in minutes.
    pub default_duration: u32,
    pub availability: AvailabilityProfile,
}
