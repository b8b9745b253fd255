//! Engine configuration.
//!
//! Read from `BOOKING_*` environment variables or deserialized from any serde
//! source. Every field has a default, so an empty environment is valid.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::horizon::DEFAULT_HORIZON_DAYS;
use crate::slots::SlotGrid;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Upper bound on the booking horizon (one leap year).
pub const MAX_HORIZON_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Days ahead the calendar covers, counting today.
    pub horizon_days: u32,
    /// Grid resolution in minutes. `None` steps by the booking duration.
    pub grid_step: Option<u32>,
    /// How long a fetched profile stays fresh in the cache.
    pub cache_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            horizon_days: DEFAULT_HORIZON_DAYS,
            grid_step: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_getter(|key| env::var(key).ok())
    }

    /// Parse config from a custom getter function (for testing)
    pub fn from_getter<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();

        Ok(EngineConfig {
            horizon_days: parse_or("BOOKING_HORIZON_DAYS", &get, defaults.horizon_days)?,
            grid_step: match get("BOOKING_GRID_STEP").filter(|s| !s.trim().is_empty()) {
                Some(raw) => Some(parse_value("BOOKING_GRID_STEP", &raw)?),
                None => defaults.grid_step,
            },
            cache_ttl_secs: parse_or("BOOKING_CACHE_TTL_SECS", &get, defaults.cache_ttl_secs)?,
        })
    }

    /// Check value ranges, reporting every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.horizon_days == 0 || self.horizon_days > MAX_HORIZON_DAYS {
            errors.push(format!(
                "horizon_days={} must be between 1 and {}",
                self.horizon_days, MAX_HORIZON_DAYS
            ));
        }
        if self.grid_step == Some(0) {
            errors.push("grid_step must be greater than 0".to_string());
        }
        if self.cache_ttl_secs == 0 {
            errors.push("cache_ttl_secs must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BookingError::Config(errors.join("; ")))
        }
    }

    /// The slot grid for bookings of `duration` minutes.
    pub fn grid_for(&self, duration: u32) -> SlotGrid {
        let grid = SlotGrid::new(duration);
        match self.grid_step {
            Some(step) => grid.with_step(step),
            None => grid,
        }
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        let secs = i64::try_from(self.cache_ttl_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        chrono::Duration::seconds(secs)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        BookingError::Config(format!(
            "{} must be a non-negative integer, got '{}'",
            key, raw
        ))
    })
}

fn parse_or<T, F>(key: &str, get: &F, default: T) -> Result<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(key).filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}
