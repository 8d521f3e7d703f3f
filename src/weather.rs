pub mod open_meteo;
pub mod synthetic;
pub mod types;
pub mod wmo;

use std::collections::HashMap;
use std::future::Future;

use crate::db::Region;
use crate::fetch_error::FetchError;

pub use open_meteo::OpenMeteoClient;
pub use synthetic::SyntheticForecaster;
pub use types::{DailySeries, HourlySeries, LocationForecast, RegionWeather, WeatherRecord};

/// Source of forecast data for a batch of regions.
///
/// One call covers the whole batch: implementations must not fan out into
/// per-region requests, and a failure means no data for any region in the
/// batch. The returned map may omit regions the upstream did not answer for.
pub trait ForecastSource {
    fn fetch_batch(
        &self,
        regions: &[Region],
    ) -> impl Future<Output = Result<HashMap<String, WeatherRecord>, FetchError>> + Send;

    /// Whether `fetch_batch` goes over the network. Local generation must not
    /// count against the upstream call quota.
    fn is_external(&self) -> bool {
        true
    }
}

/// The forecast source selected at startup: the real Open-Meteo API or the
/// synthetic generator for offline operation.
#[derive(Clone)]
pub enum ForecastProvider {
    OpenMeteo(OpenMeteoClient),
    Synthetic(SyntheticForecaster),
}

impl ForecastSource for ForecastProvider {
    async fn fetch_batch(
        &self,
        regions: &[Region],
    ) -> Result<HashMap<String, WeatherRecord>, FetchError> {
        match self {
            ForecastProvider::OpenMeteo(client) => {
                let forecasts = client.fetch_forecasts(regions).await?;
                Ok(zip_by_position(regions, forecasts))
            }
            ForecastProvider::Synthetic(generator) => {
                Ok(zip_by_position(regions, generator.generate(regions)))
            }
        }
    }

    fn is_external(&self) -> bool {
        matches!(self, ForecastProvider::OpenMeteo(_))
    }
}

/// Pair the upstream response entries with the regions that were requested.
/// Open-Meteo answers multi-location queries in request order, so position is
/// the join key; a short response simply leaves the tail regions unanswered.
fn zip_by_position(
    regions: &[Region],
    forecasts: Vec<LocationForecast>,
) -> HashMap<String, WeatherRecord> {
    regions
        .iter()
        .zip(forecasts)
        .map(|(region, forecast)| (region.id.clone(), WeatherRecord::from(forecast)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str) -> Region {
        Region {
            id: id.to_string(),
            nama: format!("Wilayah {}", id),
            lat: -6.2,
            lon: 106.8,
            admin_level: 2,
        }
    }

    #[tokio::test]
    async fn test_synthetic_provider_answers_every_region() {
        let provider = ForecastProvider::Synthetic(SyntheticForecaster::new());
        let regions = vec![region("A"), region("B"), region("C")];

        let records = provider.fetch_batch(&regions).await.unwrap();

        assert_eq!(records.len(), 3);
        assert!(records.contains_key("A"));
        assert!(records.contains_key("C"));
    }

    #[test]
    fn test_short_response_leaves_tail_unanswered() {
        let regions = vec![region("A"), region("B")];
        let forecasts = SyntheticForecaster::new().generate(&regions[..1]);

        let records = zip_by_position(&regions, forecasts);

        assert!(records.contains_key("A"));
        assert!(!records.contains_key("B"));
    }
}
