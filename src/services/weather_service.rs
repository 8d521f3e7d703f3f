use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::cache::CacheStore;
use crate::db::Region;
use crate::services::monitoring::UpstreamCallStats;
use crate::weather::types::{RegionWeather, WeatherRecord};
use crate::weather::ForecastSource;

/// Cache-first weather orchestrator.
///
/// For a set of region descriptors it answers from the cache where it can,
/// fetches the remaining regions in a single upstream batch, and writes the
/// fresh records back. A repeated invocation within the TTL performs no
/// upstream call and returns an identical payload.
#[derive(Clone)]
pub struct WeatherService<S> {
    source: S,
    cache: CacheStore,
    ttl: Duration,
    stats: UpstreamCallStats,
}

impl<S: ForecastSource> WeatherService<S> {
    pub fn new(source: S, cache: CacheStore, ttl: Duration, stats: UpstreamCallStats) -> Self {
        Self { source, cache, ttl, stats }
    }

    #[instrument(skip(self, regions), fields(count = regions.len()))]
    pub async fn weather_for_regions(
        &self,
        regions: &[Region],
    ) -> HashMap<String, RegionWeather> {
        let mut result = HashMap::with_capacity(regions.len());
        let mut misses: Vec<Region> = Vec::new();

        for region in regions {
            match self.cached_record(&region.id).await {
                Some(record) => {
                    result.insert(
                        region.id.clone(),
                        RegionWeather { region: region.clone(), weather: record },
                    );
                }
                None => misses.push(region.clone()),
            }
        }

        if misses.is_empty() {
            debug!("All {} regions served from cache", regions.len());
            return result;
        }
        debug!("{} cache hits, fetching {} regions", result.len(), misses.len());

        if self.source.is_external() {
            self.stats.record_call(misses.len());
        }
        let fetched = match self.source.fetch_batch(&misses).await {
            Ok(records) => records,
            Err(err) => {
                error!("Upstream weather fetch failed: {}", err);
                return result;
            }
        };

        for region in misses {
            // Regions the upstream did not answer for are omitted silently;
            // the client treats absence as no data.
            if let Some(record) = fetched.get(&region.id) {
                self.store_record(&region.id, record).await;
                result.insert(region.id.clone(), RegionWeather { region, weather: record.clone() });
            }
        }
        result
    }

    async fn cached_record(&self, region_id: &str) -> Option<WeatherRecord> {
        let value = self.cache.get(&cache_key(region_id)).await?;
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Discarding undecodable cache entry for {}: {}", region_id, err);
                None
            }
        }
    }

    async fn store_record(&self, region_id: &str, record: &WeatherRecord) {
        match serde_json::to_value(record) {
            Ok(value) => self.cache.set(&cache_key(region_id), &value, self.ttl).await,
            Err(err) => warn!("Failed to encode weather record for {}: {}", region_id, err),
        }
    }
}

fn cache_key(region_id: &str) -> String {
    format!("weather:{}", region_id)
}
