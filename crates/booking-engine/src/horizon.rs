//! Build a render-ready status map over a fixed booking horizon.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::classifier::{classify, DateStatus};
use crate::profile::AvailabilityProfile;
use crate::slots::SlotGrid;

/// Days ahead a customer may book, counting today.
pub const DEFAULT_HORIZON_DAYS: u32 = 60;

/// Date -> status for every day of the horizon, in date order.
pub type CalendarMap = BTreeMap<NaiveDate, DateStatus>;

/// Classify every date from `today` through `today + horizon_days - 1`.
///
/// The map always holds exactly `horizon_days` entries: classification never
/// fails, so one malformed day cannot cut the calendar short.
pub fn build_calendar(
    profile: &AvailabilityProfile,
    grid: SlotGrid,
    today: NaiveDate,
    horizon_days: u32,
) -> CalendarMap {
    today
        .iter_days()
        .take(horizon_days as usize)
        .map(|date| (date, classify(date, profile, grid, today)))
        .collect()
}

/// Dates in the horizon that are open for business, fully booked or not.
pub fn open_dates(
    profile: &AvailabilityProfile,
    grid: SlotGrid,
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<NaiveDate> {
    build_calendar(profile, grid, today, horizon_days)
        .into_iter()
        .filter(|(_, status)| *status != DateStatus::Closed)
        .map(|(date, _)| date)
        .collect()
}

/// Dates in the horizon with at least one bookable slot.
pub fn available_dates(
    profile: &AvailabilityProfile,
    grid: SlotGrid,
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<NaiveDate> {
    build_calendar(profile, grid, today, horizon_days)
        .into_iter()
        .filter(|(_, status)| status.is_available())
        .map(|(date, _)| date)
        .collect()
}
