use std::collections::HashMap;
use std::sync::LazyLock;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::db::{BoundingBox, Region, RegionRepository};
use crate::gempa::{Feature, FeatureCollection, Geometry, QuakeProperties};
use crate::services::{GempaService, MonitoringStats, TileService, UpstreamCallStats, WeatherService};
use crate::weather::types::{DailySeries, HourlySeries, RegionWeather, WeatherRecord};
use crate::weather::{wmo, ForecastProvider};

const DEFAULT_ZOOM: u8 = 9;

/// Region ids arrive comma-joined in the query string; anything outside this
/// alphabet is dropped before the ids reach a query bind.
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("hard-coded pattern"));

#[derive(Clone)]
pub struct AppState {
    /// `None` when no database is configured; region endpoints answer 503.
    pub regions: Option<RegionRepository>,
    pub weather: WeatherService<ForecastProvider>,
    pub gempa: GempaService,
    /// `None` when no MBTiles file is configured; the tile endpoint answers 503.
    pub tiles: Option<TileService>,
    pub stats: UpstreamCallStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DataCuacaParams {
    /// Viewport as `xmin,ymin,xmax,ymax` in lon/lat.
    pub bbox: Option<String>,
    /// Map zoom level; decides regency vs district lookup.
    pub zoom: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DataByIdsParams {
    /// Comma-joined region ids.
    pub ids: Option<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_string() })
}

#[utoipa::path(
    get,
    path = "/api/wmo-codes",
    responses((status = 200, description = "WMO code to [description, day icon, night icon]"))
)]
async fn wmo_codes() -> Json<serde_json::Value> {
    Json(wmo::code_map())
}

#[utoipa::path(
    get,
    path = "/api/provinsi-info",
    responses(
        (status = 200, description = "All provinces with their centroids", body = Vec<Region>),
        (status = 503, description = "No region database configured")
    )
)]
#[instrument(skip(state))]
async fn provinsi_info(State(state): State<AppState>) -> Result<Json<Vec<Region>>, StatusCode> {
    let repository = state.regions.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    let provinces = repository.find_provinces().await.map_err(internal_error)?;
    Ok(Json(provinces))
}

/// Geo-only viewport lookup. Weather is fetched separately through
/// `/api/data-by-ids` once the client decides which regions it needs.
#[utoipa::path(
    get,
    path = "/api/data-cuaca",
    params(DataCuacaParams),
    responses(
        (status = 200, description = "Region descriptors in the viewport; empty outside the zoom range", body = Vec<Region>),
        (status = 400, description = "Missing or malformed bbox/zoom"),
        (status = 503, description = "No region database configured")
    )
)]
#[instrument(skip(state, params))]
async fn data_cuaca(
    State(state): State<AppState>,
    Query(params): Query<DataCuacaParams>,
) -> Result<Json<Vec<Region>>, StatusCode> {
    let raw_bbox = params.bbox.as_deref().ok_or(StatusCode::BAD_REQUEST)?;
    let bbox = BoundingBox::parse(raw_bbox).ok_or(StatusCode::BAD_REQUEST)?;
    let zoom = parse_zoom(params.zoom.as_deref())?;

    let repository = state.regions.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    let regions = repository
        .find_in_bbox(bbox, zoom)
        .await
        .map_err(internal_error)?;
    Ok(Json(regions))
}

#[utoipa::path(
    get,
    path = "/api/data-by-ids",
    params(DataByIdsParams),
    responses(
        (status = 200, description = "Weather keyed by region id", body = HashMap<String, RegionWeather>),
        (status = 400, description = "No valid region id in the request"),
        (status = 503, description = "No region database configured")
    )
)]
#[instrument(skip(state, params))]
async fn data_by_ids(
    State(state): State<AppState>,
    Query(params): Query<DataByIdsParams>,
) -> Result<Json<HashMap<String, RegionWeather>>, StatusCode> {
    let raw = params.ids.as_deref().ok_or(StatusCode::BAD_REQUEST)?;
    let mut ids = Vec::new();
    for candidate in raw.split(',').map(str::trim) {
        if ID_PATTERN.is_match(candidate) {
            ids.push(candidate.to_string());
        } else if !candidate.is_empty() {
            warn!("Dropping invalid region id");
        }
    }
    if ids.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let repository = state.regions.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    let regions = repository.find_by_ids(&ids).await.map_err(internal_error)?;
    Ok(Json(state.weather.weather_for_regions(&regions).await))
}

#[utoipa::path(
    get,
    path = "/api/gempa/bmkg",
    responses((status = 200, description = "Recent BMKG earthquakes as GeoJSON", body = FeatureCollection))
)]
#[instrument(skip(state))]
async fn gempa_bmkg(State(state): State<AppState>) -> Json<FeatureCollection> {
    Json(state.gempa.bmkg().await)
}

#[utoipa::path(
    get,
    path = "/api/gempa/usgs",
    responses((status = 200, description = "Last-day USGS earthquakes as GeoJSON", body = FeatureCollection))
)]
#[instrument(skip(state))]
async fn gempa_usgs(State(state): State<AppState>) -> Json<FeatureCollection> {
    Json(state.gempa.usgs().await)
}

#[utoipa::path(
    get,
    path = "/api/monitoring-stats",
    responses((status = 200, description = "Upstream weather call counters", body = MonitoringStats))
)]
async fn monitoring_stats(State(state): State<AppState>) -> Json<MonitoringStats> {
    Json(state.stats.snapshot())
}

#[utoipa::path(
    get,
    path = "/tiles/{z}/{x}/{y}",
    params(
        ("z" = u8, Path, description = "Zoom level"),
        ("x" = u32, Path, description = "Tile column"),
        ("y" = String, Path, description = "Tile row with a .pbf suffix")
    ),
    responses(
        (status = 200, description = "Gzipped Mapbox vector tile"),
        (status = 404, description = "No tile at this address"),
        (status = 503, description = "No MBTiles file configured")
    )
)]
#[instrument(skip(state))]
async fn tile(
    State(state): State<AppState>,
    Path((z, x, y)): Path<(u8, u32, String)>,
) -> Result<Response, StatusCode> {
    let y: u32 = y
        .strip_suffix(".pbf")
        .and_then(|raw| raw.parse().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;

    let tiles = state.tiles.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    match tiles.tile(z, x, y).await.map_err(internal_error)? {
        Some(data) => Ok((
            [
                (header::CONTENT_TYPE, "application/x-protobuf"),
                // MBTiles stores tiles pre-gzipped.
                (header::CONTENT_ENCODING, "gzip"),
            ],
            data,
        )
            .into_response()),
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn redoc() -> Html<&'static str> {
    Html(REDOC_HTML)
}

fn parse_zoom(raw: Option<&str>) -> Result<u8, StatusCode> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_ZOOM);
    };
    // Map clients send fractional zooms; truncate like the slippy-map grid does.
    let value: f64 = raw.trim().parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    if !value.is_finite() || !(0.0..=24.0).contains(&value) {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(value as u8)
}

fn internal_error<E: std::fmt::Display>(err: E) -> StatusCode {
    error!("Request failed: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/wmo-codes", get(wmo_codes))
        .route("/api/provinsi-info", get(provinsi_info))
        .route("/api/data-cuaca", get(data_cuaca))
        .route("/api/data-by-ids", get(data_by_ids))
        .route("/api/gempa/bmkg", get(gempa_bmkg))
        .route("/api/gempa/usgs", get(gempa_usgs))
        .route("/api/monitoring-stats", get(monitoring_stats))
        .route("/tiles/{z}/{x}/{y}", get(tile))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/docs", get(redoc))
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cuaca Service API",
        description = "Region-aware weather and earthquake backend for the Indonesia map dashboard"
    ),
    paths(
        health,
        wmo_codes,
        provinsi_info,
        data_cuaca,
        data_by_ids,
        gempa_bmkg,
        gempa_usgs,
        monitoring_stats,
        tile
    ),
    components(schemas(
        HealthResponse,
        Region,
        RegionWeather,
        WeatherRecord,
        HourlySeries,
        DailySeries,
        FeatureCollection,
        Feature,
        Geometry,
        QuakeProperties,
        MonitoringStats
    ))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

const REDOC_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Cuaca Service API</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>body { margin: 0; padding: 0; }</style>
  </head>
  <body>
    <redoc spec-url="/api-docs/openapi.json"></redoc>
    <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
  </body>
</html>
"#;
