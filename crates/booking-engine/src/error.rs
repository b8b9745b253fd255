//! Error types for booking-engine operations.
//!
//! Ordinary business conditions (a closed day, a full day) are never errors.
//! They come back as [`DateStatus`](crate::classifier::DateStatus) values or
//! empty slot lists.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A time-of-day string did not match `HH:MM` with `HH` in 0..=23 and `MM` in 0..=59.
    #[error("Invalid time of day: '{0}' (expected HH:MM)")]
    Format(String),

    /// A minute offset fell outside a single day.
    #[error("Minutes out of range: {0} (expected 0..=1439)")]
    Range(u32),

    /// A calendar date string did not parse as `YYYY-MM-DD`.
    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// The chosen service, date, or time is not currently valid. Recoverable:
    /// refresh the calendar/slot views and prompt again.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The persistence collaborator could not supply a profile for the service.
    #[error("Profile unavailable for service '{service_id}': {reason}")]
    ProfileUnavailable { service_id: String, reason: String },

    /// The booking-commit collaborator rejected the request.
    #[error("Booking commit rejected: {0}")]
    CommitRejected(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
