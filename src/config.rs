use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherMode {
    /// Call the real Open-Meteo forecast API.
    OpenMeteo,
    /// Generate synthetic forecasts locally (offline mode, saves upstream quota).
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// PostGIS database with the administrative boundary tables. Optional:
    /// without it the region endpoints answer 503 instead of crashing at boot.
    pub database_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub weather_mode: WeatherMode,
    pub open_meteo_url: String,
    pub weather_cache_ttl_secs: u64,
    pub bmkg_feed_url: String,
    pub bmkg_cache_ttl_secs: u64,
    pub usgs_feed_url: String,
    pub usgs_cache_ttl_secs: u64,
    /// MBTiles container with the Indonesia basemap. Optional like the database.
    pub mbtiles_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let weather_mode = match env::var("WEATHER_MODE").as_deref() {
            Ok("synthetic") => WeatherMode::Synthetic,
            _ => WeatherMode::OpenMeteo,
        };

        Ok(Config {
            database_url: env::var("DATABASE_URL").ok(),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            weather_mode,
            open_meteo_url: env::var("OPEN_METEO_URL")
                .unwrap_or_else(|_| "https://api.open-meteo.com/v1/forecast".to_string()),
            weather_cache_ttl_secs: env::var("WEATHER_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .unwrap_or(1800),
            bmkg_feed_url: env::var("BMKG_FEED_URL").unwrap_or_else(|_| {
                "https://data.bmkg.go.id/DataMKG/TEWS/gempaterkini.json".to_string()
            }),
            bmkg_cache_ttl_secs: env::var("BMKG_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            usgs_feed_url: env::var("USGS_FEED_URL").unwrap_or_else(|_| {
                "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson"
                    .to_string()
            }),
            usgs_cache_ttl_secs: env::var("USGS_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
            mbtiles_path: env::var("MBTILES_PATH").ok(),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
