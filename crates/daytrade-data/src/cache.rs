//! Read-through result cache for price series
//!
//! Sits in front of the provider chain as an optimization layer only: an
//! entry is written atomically after the full series is assembled, so
//! concurrent identical requests are safe but not deduplicated (both may
//! perform a full fetch on a simultaneous miss).

use crate::config::ProviderKind;
use crate::period::Period;
use crate::series::PriceSeries;
use cached::{Cached, TimedCache};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for one fetch request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub symbol: String,
    pub period: Period,
    pub provider: ProviderKind,
}

impl SeriesKey {
    pub fn new(symbol: impl Into<String>, period: Period, provider: ProviderKind) -> Self {
        Self {
            symbol: symbol.into(),
            period,
            provider,
        }
    }
}

/// Thread-safe TTL cache of fully-formed price series
pub struct SeriesCache {
    cache: Arc<RwLock<TimedCache<SeriesKey, PriceSeries>>>,
}

impl SeriesCache {
    /// Create a new cache with the given entry lifetime
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a series from the cache if present and fresh
    pub async fn get(&self, key: &SeriesKey) -> Option<PriceSeries> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a fully-assembled series
    pub async fn insert(&self, key: SeriesKey, series: PriceSeries) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, series);
    }

    /// Get or fetch a series using the provided fetcher function
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: SeriesKey,
        fetcher: F,
    ) -> Result<PriceSeries, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<PriceSeries, E>>,
    {
        if let Some(series) = self.get(&key).await {
            tracing::debug!(symbol = %key.symbol, period = %key.period, "Cache hit");
            return Ok(series);
        }

        tracing::debug!(symbol = %key.symbol, period = %key.period, "Cache miss");

        let series = fetcher().await?;
        self.insert(key, series.clone()).await;

        Ok(series)
    }

    /// Drop all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for SeriesCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}
