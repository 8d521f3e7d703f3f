use chrono::{DateTime, Duration, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use rand::Rng;
use tracing::debug;

use crate::db::Region;
use crate::weather::types::{DailySeries, HourlySeries, LocationForecast};
use crate::weather::wmo::WMO_CODES;

const SYNTHETIC_TZ: Tz = chrono_tz::Asia::Singapore;
const PAST_DAYS: i64 = 7;
const HOURLY_POINTS: usize = 336;
const DAILY_POINTS: usize = 14;

/// Offline stand-in for the Open-Meteo API. Produces randomized but
/// structurally faithful forecasts: 7 past plus 7 forecast days, the same
/// series fields and timestamp formats as the real feed.
#[derive(Clone)]
pub struct SyntheticForecaster;

impl SyntheticForecaster {
    pub fn new() -> Self {
        SyntheticForecaster
    }

    pub fn generate(&self, regions: &[Region]) -> Vec<LocationForecast> {
        self.generate_at(Utc::now(), regions)
    }

    pub fn generate_at(&self, now: DateTime<Utc>, regions: &[Region]) -> Vec<LocationForecast> {
        let start_date = (now.with_timezone(&SYNTHETIC_TZ) - Duration::days(PAST_DAYS)).date_naive();
        debug!("Generating synthetic forecasts for {} regions from {}", regions.len(), start_date);
        regions
            .iter()
            .map(|region| location_forecast(region, start_date))
            .collect()
    }
}

impl Default for SyntheticForecaster {
    fn default() -> Self {
        Self::new()
    }
}

fn location_forecast(region: &Region, start_date: NaiveDate) -> LocationForecast {
    let mut rng = rand::thread_rng();
    // Local midnight of the first day; series stamps are local wall-clock
    // time, matching the timezone=auto behavior of the real feed.
    let start = start_date.and_hms_opt(0, 0, 0).unwrap_or_default();

    let mut hourly = HourlySeries {
        time: Vec::with_capacity(HOURLY_POINTS),
        temperature_2m: Vec::with_capacity(HOURLY_POINTS),
        relative_humidity_2m: Vec::with_capacity(HOURLY_POINTS),
        apparent_temperature: Vec::with_capacity(HOURLY_POINTS),
        is_day: Vec::with_capacity(HOURLY_POINTS),
        precipitation_probability: Vec::with_capacity(HOURLY_POINTS),
        weather_code: Vec::with_capacity(HOURLY_POINTS),
        wind_speed_10m: Vec::with_capacity(HOURLY_POINTS),
        wind_direction_10m: Vec::with_capacity(HOURLY_POINTS),
    };
    for hour in 0..HOURLY_POINTS as i64 {
        let stamp = start + Duration::hours(hour);
        hourly.time.push(stamp.format("%Y-%m-%dT%H:%M").to_string());
        hourly.temperature_2m.push(round1(rng.gen_range(25.0..32.0)));
        hourly.relative_humidity_2m.push(rng.gen_range(60..=90) as f64);
        hourly.apparent_temperature.push(round1(rng.gen_range(28.0..35.0)));
        hourly.is_day.push(rng.gen_range(0..=1));
        hourly.precipitation_probability.push(rng.gen_range(0..=20) as f64);
        hourly.weather_code.push(random_weather_code(&mut rng));
        hourly.wind_speed_10m.push(round1(rng.gen_range(0.5..5.0)));
        hourly.wind_direction_10m.push(rng.gen_range(0..=360) as f64);
    }

    let mut daily = DailySeries {
        time: Vec::with_capacity(DAILY_POINTS),
        weather_code: Vec::with_capacity(DAILY_POINTS),
        temperature_2m_max: Vec::with_capacity(DAILY_POINTS),
        temperature_2m_min: Vec::with_capacity(DAILY_POINTS),
    };
    for day in 0..DAILY_POINTS as i64 {
        let date = start_date + Duration::days(day);
        daily.time.push(date.format("%Y-%m-%d").to_string());
        daily.weather_code.push(random_weather_code(&mut rng));
        daily.temperature_2m_max.push(round1(rng.gen_range(30.0..34.0)));
        daily.temperature_2m_min.push(round1(rng.gen_range(23.0..26.0)));
    }

    let (utc_offset_seconds, timezone_abbreviation) = match SYNTHETIC_TZ.from_local_datetime(&start).single() {
        Some(local) => (local.offset().fix().local_minus_utc(), local.format("%Z").to_string()),
        None => (8 * 3600, "+08".to_string()),
    };

    LocationForecast {
        latitude: region.lat,
        longitude: region.lon,
        timezone: SYNTHETIC_TZ.name().to_string(),
        timezone_abbreviation,
        utc_offset_seconds,
        hourly,
        daily,
    }
}

fn random_weather_code(rng: &mut impl Rng) -> u16 {
    WMO_CODES[rng.gen_range(0..WMO_CODES.len())].code
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
