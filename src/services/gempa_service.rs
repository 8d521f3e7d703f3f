use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::fetch_error::FetchError;
use crate::gempa::{bmkg, usgs, Feature, FeatureCollection};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const BMKG_CACHE_KEY: &str = "gempa:bmkg";
const USGS_CACHE_KEY: &str = "gempa:usgs";

/// Fetches and normalizes the earthquake feeds, caching each normalized
/// collection under its own key. A failed or malformed fetch degrades to an
/// empty collection; stale data is never served past its TTL.
#[derive(Clone)]
pub struct GempaService {
    client: reqwest::Client,
    cache: CacheStore,
    bmkg_url: String,
    bmkg_ttl: Duration,
    usgs_url: String,
    usgs_ttl: Duration,
}

impl GempaService {
    pub fn new(config: &Config, cache: CacheStore) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            cache,
            bmkg_url: config.bmkg_feed_url.clone(),
            bmkg_ttl: Duration::from_secs(config.bmkg_cache_ttl_secs),
            usgs_url: config.usgs_feed_url.clone(),
            usgs_ttl: Duration::from_secs(config.usgs_cache_ttl_secs),
        }
    }

    #[instrument(skip(self))]
    pub async fn bmkg(&self) -> FeatureCollection {
        self.feed(BMKG_CACHE_KEY, &self.bmkg_url, self.bmkg_ttl, bmkg::parse_feed)
            .await
    }

    #[instrument(skip(self))]
    pub async fn usgs(&self) -> FeatureCollection {
        self.feed(USGS_CACHE_KEY, &self.usgs_url, self.usgs_ttl, usgs::parse_feed)
            .await
    }

    async fn feed(
        &self,
        cache_key: &str,
        url: &str,
        ttl: Duration,
        normalize: fn(serde_json::Value) -> Result<Vec<Feature>, serde_json::Error>,
    ) -> FeatureCollection {
        if let Some(value) = self.cache.get(cache_key).await {
            match serde_json::from_value(value) {
                Ok(collection) => {
                    debug!("Serving {} from cache", cache_key);
                    return collection;
                }
                Err(err) => warn!("Discarding undecodable cache entry {}: {}", cache_key, err),
            }
        }

        let collection = match self.fetch_and_normalize(url, normalize).await {
            Ok(collection) => collection,
            Err(err) => {
                error!("Earthquake feed {} failed: {}", url, err);
                return FeatureCollection::empty();
            }
        };

        match serde_json::to_value(&collection) {
            Ok(value) => self.cache.set(cache_key, &value, ttl).await,
            Err(err) => warn!("Failed to encode {} for cache: {}", cache_key, err),
        }
        collection
    }

    async fn fetch_and_normalize(
        &self,
        url: &str,
        normalize: fn(serde_json::Value) -> Result<Vec<Feature>, serde_json::Error>,
    ) -> Result<FeatureCollection, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status));
        }
        let body: serde_json::Value = response.json().await?;
        let features = normalize(body)?;
        debug!("Normalized {} features from {}", features.len(), url);
        Ok(FeatureCollection::new(features))
    }
}
