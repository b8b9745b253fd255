//! Profile cache with an explicit time-to-live.
//!
//! Wraps any [`ProfileSource`] and is itself a `ProfileSource`, so the
//! selection flow takes either. Entries expire `ttl` after they were fetched,
//! measured on the injected [`Clock`]. A failed refresh evicts the entry: a
//! stale profile is never served after the source has said it is gone.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::profile::{ServiceId, ServiceProfile};
use crate::source::ProfileSource;

#[derive(Debug, Clone)]
struct CachedProfile {
    profile: ServiceProfile,
    fetched_at: NaiveDateTime,
}

pub struct ProfileCache {
    source: Arc<dyn ProfileSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: RwLock<HashMap<ServiceId, CachedProfile>>,
}

impl ProfileCache {
    pub fn new(source: Arc<dyn ProfileSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        ProfileCache {
            source,
            clock,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A cache whose TTL is `config.cache_ttl_secs`.
    pub fn from_config(
        source: Arc<dyn ProfileSource>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Self {
        Self::new(source, clock, config.cache_ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached profile if still fresh, otherwise a fresh fetch.
    pub async fn get(&self, service_id: &ServiceId) -> Result<ServiceProfile> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(service_id) {
                if self.clock.now() - entry.fetched_at < self.ttl {
                    tracing::debug!(%service_id, "profile cache hit");
                    return Ok(entry.profile.clone());
                }
            }
        }

        tracing::debug!(%service_id, "profile cache miss");
        ProfileCache::refresh(self, service_id).await
    }

    /// Fetch from the source unconditionally and replace the entry.
    pub async fn refresh(&self, service_id: &ServiceId) -> Result<ServiceProfile> {
        match self.source.refresh(service_id).await {
            Ok(profile) => {
                let mut entries = self.entries.write().await;
                entries.insert(
                    service_id.clone(),
                    CachedProfile {
                        profile: profile.clone(),
                        fetched_at: self.clock.now(),
                    },
                );
                Ok(profile)
            }
            Err(err) => {
                tracing::warn!(%service_id, error = %err, "profile fetch failed; evicting cache entry");
                self.invalidate(service_id).await;
                Err(err)
            }
        }
    }

    /// Drop the entry for one service; the next `get` fetches.
    pub async fn invalidate(&self, service_id: &ServiceId) {
        let mut entries = self.entries.write().await;
        entries.remove(service_id);
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Number of entries held, fresh or expired.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileSource for ProfileCache {
    async fn fetch(&self, service_id: &ServiceId) -> Result<ServiceProfile> {
        self.get(service_id).await
    }

    async fn refresh(&self, service_id: &ServiceId) -> Result<ServiceProfile> {
        ProfileCache::refresh(self, service_id).await
    }
}
