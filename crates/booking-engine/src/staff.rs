//! Availability of an individual staff member.
//!
//! Unlike a service profile, a staff schedule has its own working window per
//! weekday and date-range leave periods. Fullness is judged on booked minutes
//! rather than grid positions: a day is fully booked once more than 80% of the
//! working window is taken.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conflict::{merge_intervals, overlaps_any};
use crate::profile::weekday_of;
use crate::slots::{grid_positions, SlotGrid};
use crate::time::TimeInterval;

/// Default distance between candidate start times for staff slots.
pub const STAFF_GRID_STEP: u32 = 30;

/// Booked share of the working window above which a day counts as full.
pub const FULLY_BOOKED_RATIO: f64 = 0.8;

/// An inclusive range of days a staff member is away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePeriod {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Free-form category ("vacation", "sick", ...).
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl LeavePeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Weekly working pattern plus leave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSchedule {
    /// Working window per weekday, indexed `0 = Sunday .. 6 = Saturday`.
    /// `None` means the staff member does not work that day.
    pub weekly: [Option<TimeInterval>; 7],
    #[serde(default)]
    pub leave: Vec<LeavePeriod>,
}

impl StaffSchedule {
    /// The same working window on each of `weekdays`, off otherwise.
    pub fn uniform(hours: TimeInterval, weekdays: impl IntoIterator<Item = u8>) -> Self {
        let mut weekly = [None; 7];
        for day in weekdays {
            if let Some(slot) = weekly.get_mut(usize::from(day)) {
                *slot = Some(hours);
            }
        }
        StaffSchedule {
            weekly,
            leave: Vec::new(),
        }
    }

    pub fn with_leave(mut self, leave: LeavePeriod) -> Self {
        self.leave.push(leave);
        self
    }

    pub fn is_on_leave(&self, date: NaiveDate) -> bool {
        self.leave.iter().any(|l| l.contains(date))
    }

    /// Regular working window on `date`'s weekday, ignoring leave.
    pub fn working_hours(&self, date: NaiveDate) -> Option<TimeInterval> {
        self.weekly[usize::from(weekday_of(date))]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffDateStatus {
    Available,
    /// Past date or a day off.
    Unavailable,
    Leave,
    FullyBooked,
}

/// One grid position in a staff member's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSlot {
    pub interval: TimeInterval,
    /// False when an existing booking overlaps the position.
    pub available: bool,
}

/// Minutes of `window` covered by `booked`. Overlapping bookings count once.
pub fn booked_minutes(window: &TimeInterval, booked: &[TimeInterval]) -> u32 {
    merge_intervals(booked, window)
        .iter()
        .map(TimeInterval::duration_minutes)
        .sum()
}

/// Classify `date` for one staff member.
///
/// In order: past dates are unavailable, leave days are leave, days off are
/// unavailable, and a day whose booked minutes exceed 80% of the working
/// window is fully booked.
pub fn staff_date_status(
    date: NaiveDate,
    schedule: &StaffSchedule,
    booked: &[TimeInterval],
    today: NaiveDate,
) -> StaffDateStatus {
    if date < today {
        return StaffDateStatus::Unavailable;
    }
    if schedule.is_on_leave(date) {
        return StaffDateStatus::Leave;
    }

    let Some(hours) = schedule.working_hours(date).filter(TimeInterval::is_well_formed) else {
        return StaffDateStatus::Unavailable;
    };

    let working = f64::from(hours.duration_minutes());
    let taken = f64::from(booked_minutes(&hours, booked));
    if taken / working > FULLY_BOOKED_RATIO {
        return StaffDateStatus::FullyBooked;
    }

    StaffDateStatus::Available
}

/// Every grid position in the staff member's working window on `date`,
/// flagged open or taken. Empty on leave days and days off.
pub fn staff_slots(
    date: NaiveDate,
    schedule: &StaffSchedule,
    duration: u32,
    booked: &[TimeInterval],
    step: u32,
) -> Vec<StaffSlot> {
    if schedule.is_on_leave(date) {
        return Vec::new();
    }
    let Some(hours) = schedule.working_hours(date) else {
        return Vec::new();
    };

    grid_positions(hours, SlotGrid::new(duration).with_step(step))
        .map(|interval| StaffSlot {
            interval,
            available: !overlaps_any(&interval, booked),
        })
        .collect()
}

/// Staff status for every day of the horizon starting at `today`.
pub fn staff_calendar(
    schedule: &StaffSchedule,
    bookings_by_date: &BTreeMap<NaiveDate, Vec<TimeInterval>>,
    today: NaiveDate,
    horizon_days: u32,
) -> BTreeMap<NaiveDate, StaffDateStatus> {
    today
        .iter_days()
        .take(horizon_days as usize)
        .map(|date| {
            let booked = bookings_by_date.get(&date).map(Vec::as_slice).unwrap_or(&[]);
            (date, staff_date_status(date, schedule, booked, today))
        })
        .collect()
}
