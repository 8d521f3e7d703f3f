use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cuaca_service::api::{create_router, AppState};
use cuaca_service::cache::CacheStore;
use cuaca_service::config::{Config, WeatherMode};
use cuaca_service::db::RegionRepository;
use cuaca_service::services::{GempaService, TileService, UpstreamCallStats, WeatherService};
use cuaca_service::weather::{ForecastProvider, OpenMeteoClient, SyntheticForecaster};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cuaca_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!("Starting cuaca service with config: {:?}", config);

    // The database is optional: without it the region endpoints answer 503
    // and the cache falls back to the in-process backend.
    let pool = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database ready");
            Some(pool)
        }
        None => {
            warn!("DATABASE_URL not set; region endpoints disabled, using in-process cache");
            None
        }
    };

    let cache = match pool.clone() {
        Some(pool) => CacheStore::shared(pool),
        None => CacheStore::memory(),
    };
    let regions = pool.map(RegionRepository::new);

    let provider = match config.weather_mode {
        WeatherMode::OpenMeteo => {
            ForecastProvider::OpenMeteo(OpenMeteoClient::new(config.open_meteo_url.clone()))
        }
        WeatherMode::Synthetic => {
            info!("Synthetic weather mode active; no upstream forecast calls will be made");
            ForecastProvider::Synthetic(SyntheticForecaster::new())
        }
    };

    let stats = UpstreamCallStats::new();
    let weather = WeatherService::new(
        provider,
        cache.clone(),
        Duration::from_secs(config.weather_cache_ttl_secs),
        stats.clone(),
    );
    let gempa = GempaService::new(&config, cache);

    let tiles = match &config.mbtiles_path {
        Some(path) => match TileService::open(path).await {
            Ok(service) => {
                info!("Serving vector tiles from {}", path);
                Some(service)
            }
            Err(err) => {
                warn!("Failed to open MBTiles file {}: {}; tile endpoint disabled", path, err);
                None
            }
        },
        None => None,
    };

    let app_state = AppState { regions, weather, gempa, tiles, stats };
    let app = create_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new());

    let addr = config.server_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
