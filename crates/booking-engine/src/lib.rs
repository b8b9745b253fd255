//! # booking-engine
//!
//! Deterministic booking availability for appointment-based services.
//!
//! Given a service's operating calendar and its already-booked intervals, the
//! engine decides which dates are bookable, whether a date is fully booked,
//! and which fixed-grid time slots remain open. All computations are pure
//! functions of an immutable [`AvailabilityProfile`] snapshot, so concurrent
//! callers sharing a snapshot always agree.
//!
//! ## Modules
//!
//! - [`time`] — `HH:MM` strings ↔ minute offsets, half-open intervals
//! - [`conflict`] — Half-open interval overlap detection and merging
//! - [`profile`] — Per-service availability snapshot
//! - [`classifier`] — Date → available / fully booked / closed
//! - [`slots`] — Fixed-grid slot enumeration
//! - [`horizon`] — Status map over the booking horizon
//! - [`selection`] — Service → date → time → confirm flow
//! - [`source`] — Async profile source seam
//! - [`cache`] — TTL cache in front of a profile source
//! - [`clock`] — Injectable wall clock
//! - [`staff`] — Per-staff-member schedules and leave
//! - [`config`] — Engine configuration
//! - [`error`] — Error types

pub mod cache;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod error;
pub mod horizon;
pub mod profile;
pub mod selection;
pub mod slots;
pub mod source;
pub mod staff;
pub mod time;

pub use cache::ProfileCache;
pub use classifier::{classify, DateStatus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use conflict::{merge_intervals, overlaps};
pub use error::BookingError;
pub use horizon::{build_calendar, CalendarMap, DEFAULT_HORIZON_DAYS};
pub use profile::{AvailabilityProfile, ServiceId, ServiceProfile};
pub use selection::{BookingCommitter, BookingFlow, BookingRequest, CommitReceipt, FlowState};
pub use slots::{enumerate_slots, SlotGrid, TimeSlot};
pub use source::{InMemoryProfileSource, ProfileSource};
pub use time::{format_minutes, parse_date, parse_time_of_day, TimeInterval, TimeOfDay};
