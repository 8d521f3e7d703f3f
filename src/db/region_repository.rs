use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::{
    BoundingBox, DbError, Region, ADMIN_LEVEL_KABUPATEN, ADMIN_LEVEL_KECAMATAN,
    ADMIN_LEVEL_PROVINSI,
};

/// Lookups against the PostGIS administrative boundary tables.
///
/// Every query binds its parameters; region ids in particular arrive from the
/// query string and must never be spliced into SQL.
#[derive(Clone)]
pub struct RegionRepository {
    pool: PgPool,
}

impl RegionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn find_provinces(&self) -> Result<Vec<Region>, DbError> {
        let regions = sqlx::query_as::<_, Region>(
            r#"
            SELECT "KDPPUM" AS id, "WADMPR" AS nama,
                   latitude AS lat, longitude AS lon,
                   $1::int4 AS admin_level
            FROM batas_provinsi
            WHERE "KDPPUM" IS NOT NULL AND "WADMPR" IS NOT NULL
              AND latitude IS NOT NULL AND longitude IS NOT NULL
            "#,
        )
        .bind(ADMIN_LEVEL_PROVINSI)
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} provinces", regions.len());
        Ok(regions)
    }

    /// Regions intersecting `bbox` at the boundary level the zoom maps to:
    /// zoom 8-10 regencies, zoom 11-14 districts, anything else nothing.
    #[instrument(skip(self), fields(zoom = zoom))]
    pub async fn find_in_bbox(
        &self,
        bbox: BoundingBox,
        zoom: u8,
    ) -> Result<Vec<Region>, DbError> {
        let (table, id_column, name_column, admin_level) = match zoom {
            8..=10 => ("batas_kabupatenkota", "KDPKAB", "WADMKK", ADMIN_LEVEL_KABUPATEN),
            11..=14 => ("batas_kecamatandistrik", "KDCPUM", "WADMKC", ADMIN_LEVEL_KECAMATAN),
            _ => {
                debug!("Zoom {} outside the region lookup range", zoom);
                return Ok(Vec::new());
            }
        };

        // Table and column names come from the match above, never from input.
        let sql = format!(
            r#"
            SELECT "{id}" AS id, "{name}" AS nama,
                   latitude AS lat, longitude AS lon,
                   $5::int4 AS admin_level
            FROM {table}
            WHERE ST_Intersects(geometry, ST_MakeEnvelope($1, $2, $3, $4, 4326))
              AND "{id}" IS NOT NULL
              AND latitude IS NOT NULL AND longitude IS NOT NULL
            "#,
            id = id_column,
            name = name_column,
            table = table,
        );

        let regions = sqlx::query_as::<_, Region>(&sql)
            .bind(bbox.xmin)
            .bind(bbox.ymin)
            .bind(bbox.xmax)
            .bind(bbox.ymax)
            .bind(admin_level)
            .fetch_all(&self.pool)
            .await?;

        debug!("Found {} regions in bbox", regions.len());
        Ok(regions)
    }

    /// Resolve a mixed list of regency and district ids in one round trip.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Region>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let regions = sqlx::query_as::<_, Region>(
            r#"
            SELECT "KDPKAB" AS id, "WADMKK" AS nama,
                   latitude AS lat, longitude AS lon,
                   $2::int4 AS admin_level
            FROM batas_kabupatenkota
            WHERE "KDPKAB" = ANY($1)
              AND latitude IS NOT NULL AND longitude IS NOT NULL
            UNION ALL
            SELECT "KDCPUM" AS id, "WADMKC" AS nama,
                   latitude AS lat, longitude AS lon,
                   $3::int4 AS admin_level
            FROM batas_kecamatandistrik
            WHERE "KDCPUM" = ANY($1)
              AND latitude IS NOT NULL AND longitude IS NOT NULL
            "#,
        )
        .bind(ids)
        .bind(ADMIN_LEVEL_KABUPATEN)
        .bind(ADMIN_LEVEL_KECAMATAN)
        .fetch_all(&self.pool)
        .await?;

        debug!("Resolved {} of {} requested ids", regions.len(), ids.len());
        Ok(regions)
    }
}
