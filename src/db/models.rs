use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Administrative region descriptor resolved from the boundary tables.
///
/// `id` is the official region code (KDPPUM/KDPKAB/KDCPUM) and doubles as the
/// weather cache key; it is stable and unique within an admin level.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Region {
    pub id: String,
    pub nama: String,
    pub lat: f64,
    pub lon: f64,
    /// 1 = province, 2 = regency/city, 3 = district.
    pub admin_level: i32,
}

/// Admin levels as stored in `admin_level`, one per boundary table.
pub const ADMIN_LEVEL_PROVINSI: i32 = 1;
pub const ADMIN_LEVEL_KABUPATEN: i32 = 2;
pub const ADMIN_LEVEL_KECAMATAN: i32 = 3;

/// Bounding box in lon/lat (EPSG:4326), `xmin,ymin,xmax,ymax` on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Parse the `bbox` query parameter. Rejects anything that is not four
    /// finite comma-separated numbers.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut coords = [0f64; 4];
        let mut parts = raw.split(',');
        for slot in coords.iter_mut() {
            *slot = parts.next()?.trim().parse().ok()?;
            if !slot.is_finite() {
                return None;
            }
        }
        if parts.next().is_some() {
            return None;
        }
        Some(BoundingBox {
            xmin: coords[0],
            ymin: coords[1],
            xmax: coords[2],
            ymax: coords[3],
        })
    }
}
