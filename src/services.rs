pub mod gempa_service;
pub mod monitoring;
pub mod tile_service;
pub mod weather_service;

pub use gempa_service::GempaService;
pub use monitoring::{MonitoringStats, UpstreamCallStats};
pub use tile_service::TileService;
pub use weather_service::WeatherService;
