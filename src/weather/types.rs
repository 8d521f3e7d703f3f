use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::Region;

/// Hourly forecast arrays as Open-Meteo returns them. Every value array is
/// aligned with `time` by index and has the same length.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub relative_humidity_2m: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
    pub is_day: Vec<u8>,
    pub precipitation_probability: Vec<f64>,
    pub weather_code: Vec<u16>,
    pub wind_speed_10m: Vec<f64>,
    pub wind_direction_10m: Vec<f64>,
}

/// Daily forecast arrays, aligned with `time` by index.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub weather_code: Vec<u16>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
}

/// One location entry of an Open-Meteo forecast response. Extra upstream
/// fields such as `generationtime_ms` are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationForecast {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub utc_offset_seconds: i32,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

/// The cached per-region forecast payload. Deliberately carries no
/// coordinates or name: those come from the region descriptor at read time,
/// so a record fetched for one region can never leak another's identity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherRecord {
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub utc_offset_seconds: i32,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

impl From<LocationForecast> for WeatherRecord {
    fn from(forecast: LocationForecast) -> Self {
        WeatherRecord {
            timezone: forecast.timezone,
            timezone_abbreviation: forecast.timezone_abbreviation,
            utc_offset_seconds: forecast.utc_offset_seconds,
            hourly: forecast.hourly,
            daily: forecast.daily,
        }
    }
}

/// Response entry for the weather endpoints: the authoritative region
/// descriptor flattened over its forecast. The two structs share no field
/// names, so the descriptor cannot be shadowed by cached data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionWeather {
    #[serde(flatten)]
    pub region: Region,
    #[serde(flatten)]
    pub weather: WeatherRecord,
}
