//! Enumerate bookable time slots on a fixed grid.
//!
//! Candidate start times begin at the opening time and advance by a fixed
//! step (the booking duration unless configured otherwise). A candidate is
//! emitted when `[start, start + duration)` fits inside business hours and
//! overlaps no existing booking. This is a grid, not a sliding window: a free
//! gap that does not line up with the grid never produces a slot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classifier;
use crate::conflict::overlaps_any;
use crate::profile::AvailabilityProfile;
use crate::time::{TimeInterval, TimeOfDay};

/// Booking duration and grid resolution, both in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotGrid {
    pub duration: u32,
    pub step: u32,
}

impl SlotGrid {
    /// A grid whose step equals the booking duration.
    pub fn new(duration: u32) -> Self {
        SlotGrid {
            duration,
            step: duration,
        }
    }

    /// Decouple the grid resolution from the booking duration.
    pub fn with_step(self, step: u32) -> Self {
        SlotGrid { step, ..self }
    }

    /// A zero duration or zero step can never advance and yields no slots.
    pub fn is_degenerate(&self) -> bool {
        self.duration == 0 || self.step == 0
    }
}

/// One bookable slot. Derived on every query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    /// Always `end - start`, in minutes.
    pub duration: u32,
}

impl TimeSlot {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start, self.end)
    }
}

impl From<TimeInterval> for TimeSlot {
    fn from(interval: TimeInterval) -> Self {
        TimeSlot {
            start: interval.start,
            end: interval.end,
            duration: interval.duration_minutes(),
        }
    }
}

/// Every grid position inside `window`, in ascending order, booked or not.
pub fn grid_positions(window: TimeInterval, grid: SlotGrid) -> impl Iterator<Item = TimeInterval> {
    let end = window.end.minutes();
    let SlotGrid { duration, step } = grid;
    let first = (!grid.is_degenerate()).then_some(window.start.minutes());

    std::iter::successors(first, move |candidate| candidate.checked_add(step))
        .take_while(move |candidate| {
            candidate
                .checked_add(duration)
                .is_some_and(|slot_end| slot_end <= end)
        })
        .map_while(move |candidate| {
            Some(TimeInterval::new(
                TimeOfDay::from_minutes(candidate).ok()?,
                TimeOfDay::from_minutes(candidate + duration).ok()?,
            ))
        })
}

/// Free grid positions inside `window` given the day's bookings.
///
/// Ignores closures entirely; callers decide whether the day is open.
pub fn open_slots_in(window: TimeInterval, booked: &[TimeInterval], grid: SlotGrid) -> Vec<TimeSlot> {
    grid_positions(window, grid)
        .filter(|candidate| !overlaps_any(candidate, booked))
        .map(TimeSlot::from)
        .collect()
}

/// Number of grid positions inside `window` blocked by at least one booking.
pub fn blocked_positions(window: TimeInterval, booked: &[TimeInterval], grid: SlotGrid) -> usize {
    grid_positions(window, grid)
        .filter(|candidate| overlaps_any(candidate, booked))
        .count()
}

/// Ordered list of bookable slots for `date`.
///
/// Closed dates (past, closed weekday, special closure) return an empty list
/// before any grid work. An empty business window, or a duration longer than
/// the window, also yields an empty list. Recomputed from scratch on every
/// call.
pub fn enumerate_slots(
    date: NaiveDate,
    profile: &AvailabilityProfile,
    grid: SlotGrid,
    today: NaiveDate,
) -> Vec<TimeSlot> {
    if classifier::closure_reason(date, profile, today).is_some() {
        return Vec::new();
    }

    open_slots_in(profile.business_hours, profile.booked_intervals_for(date), grid)
}
