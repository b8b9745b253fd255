//! Inbound seam: where availability profiles come from.
//!
//! The persistence collaborator is I/O bound, so fetching is async. A failed
//! fetch surfaces as [`BookingError::ProfileUnavailable`]; callers must not
//! fall back to treating the service as open.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::error::{BookingError, Result};
use crate::profile::{ServiceId, ServiceProfile};
use crate::time::TimeInterval;

#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the current profile for `service_id`.
    async fn fetch(&self, service_id: &ServiceId) -> Result<ServiceProfile>;

    /// Fetch bypassing any caching layer. Plain sources just fetch.
    async fn refresh(&self, service_id: &ServiceId) -> Result<ServiceProfile> {
        self.fetch(service_id).await
    }
}

/// A profile store held in memory. Useful for demos, tests, and small
/// deployments that load every profile at startup.
#[derive(Debug, Default)]
pub struct InMemoryProfileSource {
    profiles: RwLock<HashMap<ServiceId, ServiceProfile>>,
}

impl InMemoryProfileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = ServiceProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| (p.service_id.clone(), p))
            .collect();
        InMemoryProfileSource {
            profiles: RwLock::new(profiles),
        }
    }

    pub async fn upsert(&self, profile: ServiceProfile) {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.service_id.clone(), profile);
    }

    pub async fn remove(&self, service_id: &ServiceId) -> Option<ServiceProfile> {
        let mut profiles = self.profiles.write().await;
        profiles.remove(service_id)
    }

    /// Record a booking, as the commit collaborator would after a durable write.
    pub async fn record_booking(
        &self,
        service_id: &ServiceId,
        date: NaiveDate,
        interval: TimeInterval,
    ) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(service_id)
            .ok_or_else(|| unavailable(service_id))?;
        profile
            .availability
            .booked_intervals
            .entry(date)
            .or_default()
            .push(interval);
        Ok(())
    }
}

fn unavailable(service_id: &ServiceId) -> BookingError {
    BookingError::ProfileUnavailable {
        service_id: service_id.to_string(),
        reason: "no profile stored for service".to_string(),
    }
}

#[async_trait]
impl ProfileSource for InMemoryProfileSource {
    async fn fetch(&self, service_id: &ServiceId) -> Result<ServiceProfile> {
        let profiles = self.profiles.read().await;
        profiles
            .get(service_id)
            .cloned()
            .ok_or_else(|| unavailable(service_id))
    }
}
