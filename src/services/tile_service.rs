use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

/// Read-only vector tile lookups against an MBTiles file.
#[derive(Clone)]
pub struct TileService {
    pool: SqlitePool,
}

impl TileService {
    pub async fn open(path: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .immutable(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Fetch one tile. The request uses XYZ addressing while MBTiles stores
    /// TMS rows, so the row index is flipped within the zoom level.
    #[instrument(skip(self))]
    pub async fn tile(&self, z: u8, x: u32, y: u32) -> Result<Option<Vec<u8>>, sqlx::Error> {
        let flipped_y = (1i64 << z) - 1 - y as i64;
        let row = sqlx::query(
            "SELECT tile_data FROM tiles WHERE zoom_level = ? AND tile_column = ? AND tile_row = ?",
        )
        .bind(z as i64)
        .bind(x as i64)
        .bind(flipped_y)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let data: Vec<u8> = row.try_get("tile_data")?;
                debug!("Tile {}/{}/{} is {} bytes", z, x, y, data.len());
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    /// XYZ to TMS row conversion used in the query above.
    fn flip(z: u8, y: u32) -> i64 {
        (1i64 << z) - 1 - y as i64
    }

    #[test]
    fn test_row_flip() {
        assert_eq!(flip(0, 0), 0);
        assert_eq!(flip(1, 0), 1);
        assert_eq!(flip(1, 1), 0);
        assert_eq!(flip(10, 0), 1023);
        assert_eq!(flip(10, 1023), 0);
    }
}
