use std::sync::Arc;

use moka::future::Cache;

use crate::core::energy::EnergyType;
use crate::core::time::DateTime;
use crate::core::timeseries::RawSeries;
use crate::port::{DataSource, FetchError};

/// Last fetched raw series per energy type. Owned by whoever drives the dashboard; entries of
/// one energy type never affect another.
#[derive(Clone)]
pub struct SeriesCache {
    cache: Cache<EnergyType, CachedSeries>,
}

#[derive(Debug, Clone)]
pub struct CachedSeries {
    raw: Arc<RawSeries>,
    fetched_at: DateTime,
}

impl CachedSeries {
    fn new(raw: RawSeries, fetched_at: DateTime) -> Self {
        Self {
            raw: Arc::new(raw),
            fetched_at,
        }
    }

    pub fn raw(&self) -> &RawSeries {
        self.raw.as_ref()
    }

    pub fn fetched_at(&self) -> DateTime {
        self.fetched_at
    }
}

impl SeriesCache {
    pub fn new(time_to_live: std::time::Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(EnergyType::variants().len() as u64)
                .time_to_live(time_to_live)
                .build(),
        }
    }

    #[cfg(test)]
    pub fn get(&self, energy_type: EnergyType) -> Option<CachedSeries> {
        self.cache.get(&energy_type)
    }

    pub async fn insert(&self, energy_type: EnergyType, raw: RawSeries) -> CachedSeries {
        let entry = CachedSeries::new(raw, DateTime::now());
        self.cache.insert(energy_type, entry.clone()).await;
        entry
    }

    pub async fn invalidate(&self, energy_type: EnergyType) {
        tracing::debug!("Invalidating series cache for {}", energy_type);
        self.cache.invalidate(&energy_type).await;
    }

    /// Cached entry or a fresh fetch. Concurrent callers for the same energy type share a single
    /// fetch; failed fetches are not cached.
    pub async fn get_or_fetch<S: DataSource>(
        &self,
        energy_type: EnergyType,
        source: &S,
    ) -> Result<CachedSeries, FetchError> {
        self.cache
            .try_get_with(energy_type, async {
                tracing::debug!("No cached series found for {}, fetching from data source", energy_type);
                let raw = source.fetch(energy_type).await?;
                tracing::debug!("Fetched {} entries for {}", raw.len(), energy_type);
                Ok::<_, FetchError>(CachedSeries::new(raw, DateTime::now()))
            })
            .await
            .map_err(|e| e.as_ref().clone())
    }
}
