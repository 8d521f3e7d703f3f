use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::gempa::feature::{Feature, QuakeProperties};

pub const SOURCE: &str = "bmkg";

#[derive(Deserialize)]
struct BmkgFeed {
    #[serde(rename = "Infogempa")]
    infogempa: BmkgInfogempa,
}

#[derive(Deserialize)]
struct BmkgInfogempa {
    gempa: Vec<Value>,
}

/// One BMKG record. Every field is optional so a single bad record cannot
/// fail the whole feed; mandatory pieces are checked per record instead.
#[derive(Deserialize)]
struct BmkgQuake {
    #[serde(rename = "Tanggal")]
    tanggal: Option<String>,
    #[serde(rename = "Jam")]
    jam: Option<String>,
    #[serde(rename = "DateTime")]
    datetime: Option<String>,
    #[serde(rename = "Coordinates")]
    coordinates: Option<String>,
    #[serde(rename = "Magnitude")]
    magnitude: Option<String>,
    #[serde(rename = "Kedalaman")]
    kedalaman: Option<String>,
    #[serde(rename = "Wilayah")]
    wilayah: Option<String>,
    #[serde(rename = "Potensi")]
    potensi: Option<String>,
}

/// Normalize the BMKG `gempaterkini` feed. Records without parseable
/// coordinates are skipped with a warning; everything else degrades field by
/// field.
pub fn parse_feed(body: Value) -> Result<Vec<Feature>, serde_json::Error> {
    let feed: BmkgFeed = serde_json::from_value(body)?;
    let total = feed.infogempa.gempa.len();

    let mut features = Vec::with_capacity(total);
    for record in feed.infogempa.gempa {
        match record_to_feature(record) {
            Some(feature) => features.push(feature),
            None => warn!("Skipping unparseable BMKG record"),
        }
    }
    if features.len() < total {
        warn!("Parsed {} of {} BMKG records", features.len(), total);
    }
    Ok(features)
}

fn record_to_feature(record: Value) -> Option<Feature> {
    let record: BmkgQuake = serde_json::from_value(record).ok()?;
    let (lat, lon) = parse_coordinates(record.coordinates.as_deref()?)?;

    let magnitude = record
        .magnitude
        .as_deref()
        .and_then(|m| m.trim().parse::<f64>().ok());
    let depth_km = record.kedalaman.as_deref().and_then(parse_depth_km);
    let is_tsunami = record
        .potensi
        .as_deref()
        .map(tsunami_potential)
        .unwrap_or(false);
    let occurred_at = record
        .datetime
        .or_else(|| match (record.tanggal, record.jam) {
            (Some(tanggal), Some(jam)) => Some(format!("{} {}", tanggal, jam)),
            _ => None,
        })
        .unwrap_or_default();

    Some(Feature::new(
        lon,
        lat,
        QuakeProperties::build(
            SOURCE,
            magnitude,
            depth_km,
            record.wilayah.unwrap_or_default(),
            occurred_at,
            is_tsunami,
        ),
    ))
}

/// BMKG writes coordinates as `"lat,lon"` in one string.
fn parse_coordinates(raw: &str) -> Option<(f64, f64)> {
    let (lat, lon) = raw.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some((lat, lon))
}

/// Depth arrives as `"NN km"`.
fn parse_depth_km(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches("km")
        .trim_end_matches("Km")
        .trim()
        .parse()
        .ok()
}

/// BMKG states potential in prose. "Tidak berpotensi tsunami" must not be
/// mistaken for a warning, so the negation is checked first.
fn tsunami_potential(potensi: &str) -> bool {
    let lower = potensi.to_lowercase();
    !lower.contains("tidak berpotensi") && lower.contains("berpotensi tsunami")
}
