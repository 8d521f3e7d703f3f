use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::db::Region;
use crate::fetch_error::FetchError;
use crate::weather::types::LocationForecast;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const HOURLY_VARIABLES: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
is_day,precipitation_probability,weather_code,wind_speed_10m,wind_direction_10m";
const DAILY_VARIABLES: &str = "weather_code,temperature_2m_max,temperature_2m_min";

/// Open-Meteo forecast client. One HTTP request covers an arbitrary number of
/// coordinates by comma-joining them into the `latitude`/`longitude`
/// parameters; the response is one entry per coordinate, in request order.
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, base_url }
    }

    #[instrument(skip(self, regions), fields(count = regions.len()))]
    pub async fn fetch_forecasts(
        &self,
        regions: &[Region],
    ) -> Result<Vec<LocationForecast>, FetchError> {
        if regions.is_empty() {
            return Ok(Vec::new());
        }

        let latitudes = join_coordinates(regions.iter().map(|r| r.lat));
        let longitudes = join_coordinates(regions.iter().map(|r| r.lon));

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitudes.as_str()),
                ("longitude", longitudes.as_str()),
                ("hourly", HOURLY_VARIABLES),
                ("daily", DAILY_VARIABLES),
                ("timezone", "auto"),
                ("forecast_days", "7"),
                ("past_days", "7"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status));
        }

        let body: serde_json::Value = response.json().await?;
        let forecasts = parse_forecast_body(body)?;
        debug!("Fetched {} forecasts for {} regions", forecasts.len(), regions.len());
        Ok(forecasts)
    }
}

/// Open-Meteo answers a single-coordinate query with a bare object and a
/// multi-coordinate query with an array. Both normalize to a vector.
pub fn parse_forecast_body(body: serde_json::Value) -> Result<Vec<LocationForecast>, FetchError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ForecastBody {
        Single(Box<LocationForecast>),
        Batch(Vec<LocationForecast>),
    }

    match serde_json::from_value(body)? {
        ForecastBody::Single(forecast) => Ok(vec![*forecast]),
        ForecastBody::Batch(forecasts) => Ok(forecasts),
    }
}

fn join_coordinates(values: impl Iterator<Item = f64>) -> String {
    values
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
