mod cache;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use cache::{CachedSeries, SeriesCache};

use moka::future::Cache;
use serde::Serialize;

use crate::core::aggregate::{
    self, AvgMonthlySeries, CumulativeSeries, MonthlySeries, YearlySeries,
};
use crate::core::energy::{EnergyType, Unit};
use crate::core::time::DateTime;
use crate::core::timeseries::RawSeries;
use crate::port::{DataSource, FetchError};

//sessions without a refresh for this long start over
const SESSION_IDLE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// All derived views of one energy type, ready for a rendering surface.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub energy_type: EnergyType,
    pub unit: Unit,
    pub reference_year: i32,
    pub fetched_at: DateTime,
    pub yearly: YearlySeries,
    pub monthly: MonthlySeries,
    pub avg_monthly: AvgMonthlySeries,
    pub cumulative: CumulativeSeries,
}

impl DashboardView {
    pub fn new(energy_type: EnergyType, raw: &RawSeries, reference_year: i32, fetched_at: DateTime) -> Self {
        Self {
            energy_type,
            unit: energy_type.unit(),
            reference_year,
            fetched_at,
            yearly: aggregate::yearly(raw),
            monthly: aggregate::monthly_by_year(raw, reference_year),
            avg_monthly: aggregate::avg_monthly(raw),
            cumulative: aggregate::cumulative(raw),
        }
    }

    fn of_cached(energy_type: EnergyType, cached: &CachedSeries) -> Self {
        Self::new(energy_type, cached.raw(), DateTime::now().year(), cached.fetched_at())
    }
}

pub struct DashboardApi<S> {
    source: S,
    cache: SeriesCache,
    selections: Cache<String, Arc<AtomicU64>>,
}

/// Latest energy type selection of one dashboard session.
struct Selection {
    counter: Arc<AtomicU64>,
    value: u64,
}

impl Selection {
    fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.value
    }
}

impl<S: DataSource> DashboardApi<S> {
    pub fn new(source: S, cache: SeriesCache) -> Self {
        Self {
            source,
            cache,
            selections: Cache::builder().time_to_idle(SESSION_IDLE_TIMEOUT).build(),
        }
    }

    pub async fn raw_series(&self, energy_type: EnergyType) -> Result<CachedSeries, FetchError> {
        self.cache.get_or_fetch(energy_type, &self.source).await
    }

    /// Applies `f` to the cached-or-fetched series of `energy_type` and the current reference year.
    pub async fn aggregate<T>(
        &self,
        energy_type: EnergyType,
        f: impl FnOnce(&RawSeries, i32) -> T,
    ) -> Result<T, FetchError> {
        let cached = self.loaded(energy_type).await?;

        Ok(f(cached.raw(), DateTime::now().year()))
    }

    pub async fn view(&self, energy_type: EnergyType) -> Result<DashboardView, FetchError> {
        let cached = self.loaded(energy_type).await?;

        Ok(DashboardView::of_cached(energy_type, &cached))
    }

    async fn loaded(&self, energy_type: EnergyType) -> Result<CachedSeries, FetchError> {
        let cached = self.raw_series(energy_type).await.inspect_err(|e| {
            tracing::error!("Error loading data for {}: {}", energy_type, e);
        })?;

        tracing::debug!(
            "Aggregating {} from data fetched {}s ago",
            energy_type,
            cached.fetched_at().elapsed().num_seconds()
        );

        Ok(cached)
    }

    /// Selects `energy_type` as the displayed one of `session` and reloads its data from the
    /// source. The fetch always goes to the source, also when another fetch of the same energy
    /// type is in flight, and its result replaces the cached entry.
    ///
    /// Returns `Ok(None)` if the same session selected again while the fetch was in flight; the
    /// outdated result (or error) is dropped in that case. Selections of other sessions never
    /// discard a result. Without a session, nothing is discarded.
    pub async fn switch_energy_type(
        &self,
        session: Option<&str>,
        energy_type: EnergyType,
    ) -> Result<Option<DashboardView>, FetchError> {
        let selection = match session {
            Some(session) => Some(self.select(session).await),
            None => None,
        };
        tracing::info!("Switching to {} (session {:?})", energy_type, session);

        self.cache.invalidate(energy_type).await;
        let result = self.source.fetch(energy_type).await;

        let cached = match result {
            Ok(raw) => Ok(self.cache.insert(energy_type, raw).await),
            Err(e) => Err(e),
        };

        if selection.as_ref().is_some_and(|s| !s.is_current()) {
            tracing::info!("Discarding outdated result for {}, selection changed meanwhile", energy_type);
            return Ok(None);
        }

        let cached = cached.inspect_err(|e| {
            tracing::error!("Error loading data for {}: {}", energy_type, e);
        })?;

        Ok(Some(DashboardView::of_cached(energy_type, &cached)))
    }

    async fn select(&self, session: &str) -> Selection {
        let counter = self
            .selections
            .get_with(session.to_owned(), async { Arc::new(AtomicU64::new(0)) })
            .await;
        let value = counter.fetch_add(1, Ordering::SeqCst) + 1;

        Selection { counter, value }
    }

    /// Fetches all energy types concurrently. Returns the number of successfully loaded types.
    pub async fn preload(&self) -> usize {
        tracing::debug!("Start preloading series cache");

        let futures: Vec<_> = EnergyType::variants()
            .iter()
            .map(|energy_type| async move {
                match self.raw_series(*energy_type).await {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::error!("Error preloading {}: {}", energy_type, e);
                        false
                    }
                }
            })
            .collect();

        let results = futures::future::join_all(futures).await;
        let loaded = results.into_iter().filter(|ok| *ok).count();

        tracing::debug!("Preloading series cache done for {} energy types", loaded);
        loaded
    }
}
