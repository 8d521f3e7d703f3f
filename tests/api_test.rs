// API tests that exercise the Axum router without a database or MBTiles file

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt; // For `.collect()`
use serde_json::Value;
use tower::ServiceExt; // For `oneshot`

use cuaca_service::api::{create_router, AppState};
use cuaca_service::cache::CacheStore;
use cuaca_service::config::{Config, WeatherMode};
use cuaca_service::services::{GempaService, UpstreamCallStats, WeatherService};
use cuaca_service::weather::{ForecastProvider, SyntheticForecaster};

/// State with no database and no tile file: the degraded-but-alive setup.
fn offline_state() -> AppState {
    let config = Config {
        database_url: None,
        server_host: "127.0.0.1".to_string(),
        server_port: 5000,
        weather_mode: WeatherMode::Synthetic,
        open_meteo_url: String::new(),
        weather_cache_ttl_secs: 1800,
        // Never contacted by these tests; an unroutable port guards against it.
        bmkg_feed_url: "http://127.0.0.1:9/gempaterkini.json".to_string(),
        bmkg_cache_ttl_secs: 60,
        usgs_feed_url: "http://127.0.0.1:9/all_day.geojson".to_string(),
        usgs_cache_ttl_secs: 300,
        mbtiles_path: None,
    };

    let cache = CacheStore::memory();
    let stats = UpstreamCallStats::new();
    let weather = WeatherService::new(
        ForecastProvider::Synthetic(SyntheticForecaster::new()),
        cache.clone(),
        Duration::from_secs(config.weather_cache_ttl_secs),
        stats.clone(),
    );
    let gempa = GempaService::new(&config, cache);

    AppState { regions: None, weather, gempa, tiles: None, stats }
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let app = create_router(offline_state());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_wmo_codes() {
    let (status, body) = get("/api/wmo-codes").await;
    assert_eq!(status, StatusCode::OK);

    let map = body.as_object().unwrap();
    assert_eq!(map.len(), 21);
    let clear = map.get("0").unwrap().as_array().unwrap();
    assert_eq!(clear.len(), 3);
    assert_eq!(clear[0], "Cerah");
}

#[tokio::test]
async fn test_provinsi_info_without_database() {
    let (status, _) = get("/api/provinsi-info").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_data_cuaca_requires_bbox() {
    let (status, _) = get("/api/data-cuaca").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_data_cuaca_rejects_malformed_bbox() {
    let (status, _) = get("/api/data-cuaca?bbox=not,a,real,box").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get("/api/data-cuaca?bbox=1,2,3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_data_cuaca_rejects_malformed_zoom() {
    let (status, _) = get("/api/data-cuaca?bbox=106.6,-6.4,107.1,-6.0&zoom=deep").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_data_cuaca_without_database() {
    let (status, _) = get("/api/data-cuaca?bbox=106.6,-6.4,107.1,-6.0&zoom=9").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_data_by_ids_requires_ids() {
    let (status, _) = get("/api/data-by-ids").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_data_by_ids_rejects_all_invalid_ids() {
    let (status, _) = get("/api/data-by-ids?ids=31%3BDROP,%20,a%20b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_data_by_ids_without_database() {
    // Valid ids get past validation, then fail on the missing repository.
    let (status, _) = get("/api/data-by-ids?ids=31.71,34.04").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_tiles_without_mbtiles_file() {
    let (status, _) = get("/tiles/9/412/263.pbf").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_tiles_reject_missing_pbf_suffix() {
    let (status, _) = get("/tiles/9/412/263").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_monitoring_stats_shape() {
    let (status, body) = get("/api/monitoring-stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["panggilan_eksternal_per_menit"], 0);
    assert_eq!(body["panggilan_eksternal_per_fungsi_terakhir"], 0);
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let (status, body) = get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["openapi"].is_string());
    assert_eq!(body["info"]["title"], "Cuaca Service API");
    assert!(body["paths"]["/api/data-cuaca"].is_object());
    assert!(body["paths"]["/api/gempa/bmkg"].is_object());
}

#[tokio::test]
async fn test_docs_page_is_served() {
    let app = create_router(offline_state());
    let response = app
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("redoc"));
}
