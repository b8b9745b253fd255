//! Classify a calendar date as available, fully booked, or closed.
//!
//! Rules are applied in order and the first match wins:
//!
//! 1. Dates strictly before `today` are closed.
//! 2. Closed weekdays are closed.
//! 3. Special closure dates are closed.
//! 4. If no slot can be enumerated, or the number of grid positions blocked by
//!    bookings reaches `floor(window / duration)`, the date is fully booked.
//! 5. Otherwise the date is available.
//!
//! Rule 4 counts quantized grid positions, not continuous free time. A day
//! with a free gap that does not line up with the grid is reported fully
//! booked.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::profile::{weekday_of, AvailabilityProfile};
use crate::slots::{self, SlotGrid};

/// Bookability of a single date. Derived per (date, profile, duration), never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStatus {
    Available,
    FullyBooked,
    Closed,
}

impl DateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateStatus::Available => "available",
            DateStatus::FullyBooked => "fully_booked",
            DateStatus::Closed => "closed",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DateStatus::Available)
    }
}

impl fmt::Display for DateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a date is closed, independent of bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    Past,
    ClosedWeekday,
    SpecialClosure,
}

/// Rules 1-3: the reason `date` is closed, if any.
pub fn closure_reason(
    date: NaiveDate,
    profile: &AvailabilityProfile,
    today: NaiveDate,
) -> Option<ClosureReason> {
    if date < today {
        Some(ClosureReason::Past)
    } else if profile.is_closed_on_weekday(weekday_of(date)) {
        Some(ClosureReason::ClosedWeekday)
    } else if profile.special_closures_contains(date) {
        Some(ClosureReason::SpecialClosure)
    } else {
        None
    }
}

/// Classify `date` for bookings of `grid.duration` minutes.
///
/// Never fails. A degenerate grid (zero duration or step) cannot describe a
/// bookable appointment and degrades to [`DateStatus::Closed`].
pub fn classify(
    date: NaiveDate,
    profile: &AvailabilityProfile,
    grid: SlotGrid,
    today: NaiveDate,
) -> DateStatus {
    if closure_reason(date, profile, today).is_some() {
        return DateStatus::Closed;
    }

    if grid.is_degenerate() {
        tracing::warn!(%date, ?grid, "degenerate slot grid; treating date as closed");
        return DateStatus::Closed;
    }

    let window = profile.business_hours;
    let booked = profile.booked_intervals_for(date);

    if slots::open_slots_in(window, booked, grid).is_empty() {
        return DateStatus::FullyBooked;
    }

    let theoretical_max = (window.duration_minutes() / grid.duration) as usize;
    if slots::blocked_positions(window, booked, grid) >= theoretical_max {
        return DateStatus::FullyBooked;
    }

    DateStatus::Available
}
