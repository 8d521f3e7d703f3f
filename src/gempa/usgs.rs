use chrono::{SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::gempa::feature::{Feature, QuakeProperties};

pub const SOURCE: &str = "usgs";

#[derive(Deserialize)]
struct UsgsFeed {
    features: Vec<Value>,
}

#[derive(Deserialize)]
struct UsgsFeature {
    properties: UsgsProperties,
    geometry: Option<UsgsGeometry>,
}

#[derive(Deserialize)]
struct UsgsProperties {
    mag: Option<f64>,
    place: Option<String>,
    /// Epoch milliseconds.
    time: Option<i64>,
    tsunami: Option<i64>,
}

#[derive(Deserialize)]
struct UsgsGeometry {
    /// `[longitude, latitude, depth_km]`.
    coordinates: Vec<Value>,
}

/// Normalize the USGS all-day GeoJSON feed into the shared feature shape.
/// Records without a usable point geometry are skipped with a warning.
pub fn parse_feed(body: Value) -> Result<Vec<Feature>, serde_json::Error> {
    let feed: UsgsFeed = serde_json::from_value(body)?;
    let total = feed.features.len();

    let mut features = Vec::with_capacity(total);
    for record in feed.features {
        match record_to_feature(record) {
            Some(feature) => features.push(feature),
            None => warn!("Skipping unparseable USGS record"),
        }
    }
    if features.len() < total {
        warn!("Parsed {} of {} USGS records", features.len(), total);
    }
    Ok(features)
}

fn record_to_feature(record: Value) -> Option<Feature> {
    let record: UsgsFeature = serde_json::from_value(record).ok()?;
    let coordinates = record.geometry?.coordinates;
    let lon = coordinates.first()?.as_f64()?;
    let lat = coordinates.get(1)?.as_f64()?;
    // Depth is occasionally null upstream; the record stays, intensity is 0.
    let depth_km = coordinates.get(2).and_then(Value::as_f64);

    let occurred_at = record
        .properties
        .time
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
        .map(|stamp| stamp.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();
    let is_tsunami = record.properties.tsunami.unwrap_or(0) != 0;

    Some(Feature::new(
        lon,
        lat,
        QuakeProperties::build(
            SOURCE,
            record.properties.mag,
            depth_km,
            record.properties.place.unwrap_or_default(),
            occurred_at,
            is_tsunami,
        ),
    ))
}
