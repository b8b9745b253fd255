//! Property-based tests for slot enumeration and classification.
//!
//! These verify invariants that hold for *any* profile, not just the fixed
//! examples in `slots_tests.rs` and `classifier_tests.rs`.

use booking_engine::classifier::{classify, DateStatus};
use booking_engine::conflict::overlaps;
use booking_engine::horizon::build_calendar;
use booking_engine::profile::AvailabilityProfile;
use booking_engine::slots::{enumerate_slots, SlotGrid};
use booking_engine::time::{format_minutes, parse_time_of_day, TimeInterval, TimeOfDay};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn tod(minutes: u32) -> TimeOfDay {
    TimeOfDay::from_minutes(minutes).unwrap()
}

/// Business hours between 06:00 and 22:00, at least 30 minutes long.
fn arb_business_hours() -> impl Strategy<Value = TimeInterval> {
    (360u32..=1200, 30u32..=600).prop_map(|(start, len)| {
        let end = (start + len).min(1320);
        TimeInterval::new(tod(start), tod(end))
    })
}

fn arb_booking() -> impl Strategy<Value = TimeInterval> {
    (300u32..=1380, 5u32..=180).prop_map(|(start, len)| {
        let end = (start + len).min(1439);
        TimeInterval::new(tod(start), tod(end))
    })
}

fn arb_duration() -> impl Strategy<Value = u32> {
    prop_oneof![Just(15u32), Just(30), Just(45), Just(60), Just(90), Just(120), 5u32..=240]
}

/// A date in July/August 2025.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..60).prop_map(|offset| base_date() + Duration::days(offset))
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
}

fn arb_profile() -> impl Strategy<Value = (AvailabilityProfile, NaiveDate)> {
    (
        arb_business_hours(),
        prop::collection::btree_set(0u8..7, 0..3),
        arb_date(),
        prop::collection::vec(arb_booking(), 0..8),
        prop::bool::ANY,
    )
        .prop_map(|(hours, closed, date, bookings, special)| {
            let mut profile = AvailabilityProfile::new(hours).with_closed_weekdays(closed);
            for booking in bookings {
                profile = profile.with_booking(date, booking);
            }
            if special {
                profile = profile.with_special_closure(date + Duration::days(1));
            }
            (profile, date)
        })
}

fn today() -> NaiveDate {
    base_date() + Duration::days(10)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn enumeration_is_deterministic((profile, date) in arb_profile(), duration in arb_duration()) {
        let grid = SlotGrid::new(duration);
        prop_assert_eq!(
            enumerate_slots(date, &profile, grid, today()),
            enumerate_slots(date, &profile, grid, today())
        );
        prop_assert_eq!(
            classify(date, &profile, grid, today()),
            classify(date, &profile, grid, today())
        );
    }

    #[test]
    fn closed_dates_have_no_slots((profile, date) in arb_profile(), duration in arb_duration()) {
        let grid = SlotGrid::new(duration);
        if classify(date, &profile, grid, today()) == DateStatus::Closed {
            prop_assert!(enumerate_slots(date, &profile, grid, today()).is_empty());
        }
    }

    #[test]
    fn slots_stay_inside_business_hours((profile, date) in arb_profile(), duration in arb_duration()) {
        let hours = profile.business_hours;
        for slot in enumerate_slots(date, &profile, SlotGrid::new(duration), today()) {
            prop_assert!(hours.start <= slot.start);
            prop_assert!(slot.end <= hours.end);
            prop_assert_eq!(slot.end.minutes() - slot.start.minutes(), duration);
            prop_assert_eq!(slot.duration, duration);
        }
    }

    #[test]
    fn slots_never_overlap_bookings((profile, date) in arb_profile(), duration in arb_duration()) {
        let booked = profile.booked_intervals_for(date);
        for slot in enumerate_slots(date, &profile, SlotGrid::new(duration), today()) {
            for b in booked {
                prop_assert!(!overlaps(&slot.interval(), b), "slot {} overlaps booking {}", slot.interval(), b);
            }
        }
    }

    #[test]
    fn slots_sit_on_the_grid((profile, date) in arb_profile(), duration in arb_duration()) {
        let start = profile.business_hours.start.minutes();
        let slots = enumerate_slots(date, &profile, SlotGrid::new(duration), today());
        for slot in &slots {
            prop_assert_eq!((slot.start.minutes() - start) % duration, 0);
        }
        for pair in slots.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn unbooked_open_day_has_consecutive_slots(hours in arb_business_hours(), duration in arb_duration()) {
        let profile = AvailabilityProfile::new(hours);
        let slots = enumerate_slots(today(), &profile, SlotGrid::new(duration), today());

        prop_assert_eq!(slots.len() as u32, hours.duration_minutes() / duration);
        for pair in slots.windows(2) {
            prop_assert_eq!(pair[1].start.minutes(), pair[0].start.minutes() + duration);
        }
    }

    #[test]
    fn available_iff_some_slot((profile, date) in arb_profile(), duration in arb_duration()) {
        let grid = SlotGrid::new(duration);
        let status = classify(date, &profile, grid, today());
        let slots = enumerate_slots(date, &profile, grid, today());
        prop_assert_eq!(status == DateStatus::Available, !slots.is_empty());
    }

    #[test]
    fn past_dates_are_always_closed((profile, _) in arb_profile(), back in 1i64..30, duration in arb_duration()) {
        let past = today() - Duration::days(back);
        prop_assert_eq!(classify(past, &profile, SlotGrid::new(duration), today()), DateStatus::Closed);
    }

    #[test]
    fn special_closures_are_always_closed((profile, date) in arb_profile(), duration in arb_duration()) {
        let closed = profile.with_special_closure(date);
        prop_assert_eq!(classify(date, &closed, SlotGrid::new(duration), today()), DateStatus::Closed);
    }

    #[test]
    fn calendar_has_one_entry_per_day((profile, _) in arb_profile(), days in 0u32..120, duration in arb_duration()) {
        let calendar = build_calendar(&profile, SlotGrid::new(duration), today(), days);
        prop_assert_eq!(calendar.len(), days as usize);
    }

    #[test]
    fn format_then_parse_is_identity(minutes in 0u32..1440) {
        let text = format_minutes(minutes).unwrap();
        prop_assert_eq!(parse_time_of_day(&text).unwrap(), minutes);
    }
}
