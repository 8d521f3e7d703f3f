use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const INTENSITY_BASE: f64 = 1.5;
const INTENSITY_MAG_COEFF: f64 = 1.5;
const INTENSITY_DEPTH_COEFF: f64 = 1.1;
const INTENSITY_DEPTH_OFFSET_KM: f64 = 10.0;

/// GeoJSON FeatureCollection of normalized earthquake events. Both upstream
/// feeds map into this one shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Served when an upstream feed is unreachable, so the map layer renders
    /// with no markers instead of erroring.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: QuakeProperties,
}

impl Feature {
    pub fn new(lon: f64, lat: f64, properties: QuakeProperties) -> Self {
        Feature {
            kind: "Feature".to_string(),
            geometry: Geometry {
                kind: "Point".to_string(),
                coordinates: vec![lon, lat],
            },
            properties,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`, GeoJSON axis order.
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuakeProperties {
    pub magnitude: f64,
    pub place: String,
    pub occurred_at: String,
    pub depth_km: f64,
    pub is_tsunami: bool,
    pub estimated_intensity: f64,
    pub impact_label: String,
    pub impact_color: String,
    pub pulse_mode: String,
    pub source: String,
}

impl QuakeProperties {
    /// Assemble properties from normalized feed fields, deriving the
    /// intensity estimate and impact tier.
    pub fn build(
        source: &str,
        magnitude: Option<f64>,
        depth_km: Option<f64>,
        place: String,
        occurred_at: String,
        is_tsunami: bool,
    ) -> Self {
        let estimated_intensity = estimate_intensity(magnitude, depth_km);
        let impact = classify_impact(estimated_intensity, is_tsunami);
        QuakeProperties {
            magnitude: magnitude.unwrap_or(0.0),
            place,
            occurred_at,
            depth_km: depth_km.unwrap_or(0.0),
            is_tsunami,
            estimated_intensity,
            impact_label: impact.label.to_string(),
            impact_color: impact.color.to_string(),
            pulse_mode: impact.pulse.to_string(),
            source: source.to_string(),
        }
    }
}

/// Rough shaking intensity on a 1-12 scale: grows with magnitude, shrinks
/// with the log of depth. Missing or non-physical inputs yield 0, which the
/// tier mapping treats as weak.
pub fn estimate_intensity(magnitude: Option<f64>, depth_km: Option<f64>) -> f64 {
    let (Some(magnitude), Some(depth_km)) = (magnitude, depth_km) else {
        return 0.0;
    };
    if !magnitude.is_finite() || !depth_km.is_finite() || magnitude <= 0.0 || depth_km < 0.0 {
        return 0.0;
    }
    let raw = INTENSITY_BASE + INTENSITY_MAG_COEFF * magnitude
        - INTENSITY_DEPTH_COEFF * (depth_km + INTENSITY_DEPTH_OFFSET_KM).ln();
    raw.clamp(1.0, 12.0)
}

/// Marker styling tier for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub label: &'static str,
    pub color: &'static str,
    pub pulse: &'static str,
}

const IMPACT_TSUNAMI: Impact = Impact { label: "tsunami-risk", color: "#d63031", pulse: "sonar" };
const IMPACT_SEVERE: Impact = Impact { label: "severe", color: "#e74c3c", pulse: "fast" };
const IMPACT_MODERATE: Impact = Impact { label: "moderate", color: "#f1c40f", pulse: "slow" };
const IMPACT_WEAK: Impact = Impact { label: "weak", color: "#3498db", pulse: "none" };

/// Tsunami potential overrides intensity; otherwise the tier follows the
/// estimate with boundaries at 3 and 6.
pub fn classify_impact(intensity: f64, is_tsunami: bool) -> Impact {
    if is_tsunami {
        IMPACT_TSUNAMI
    } else if intensity >= 6.0 {
        IMPACT_SEVERE
    } else if intensity >= 3.0 {
        IMPACT_MODERATE
    } else {
        IMPACT_WEAK
    }
}
