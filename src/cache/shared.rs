use std::time::Duration;

use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument, warn};

/// Shared cache backend on the Postgres instance every deployment already has.
///
/// Entries live in the `kv_cache` table (JSONB payload + expiry). Expired rows
/// are filtered on read and overwritten on refresh; nothing deletes them
/// eagerly.
#[derive(Clone)]
pub struct SharedCache {
    pool: PgPool,
}

impl SharedCache {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Option<Value> {
        let result = sqlx::query(
            r#"
            SELECT value FROM kv_cache
            WHERE cache_key = $1 AND expires_at > NOW()
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => match row.try_get::<Value, _>("value") {
                Ok(value) => {
                    debug!("Cache hit for {}", key);
                    Some(value)
                }
                Err(e) => {
                    warn!("Failed to decode cached value for {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Cache lookup for {} failed, treating as miss: {}", key, e);
                None
            }
        }
    }

    #[instrument(skip(self, value))]
    pub async fn set(&self, key: &str, value: &Value, ttl: Duration) {
        let result = sqlx::query(
            r#"
            INSERT INTO kv_cache (cache_key, value, expires_at)
            VALUES ($1, $2, NOW() + $3 * INTERVAL '1 second')
            ON CONFLICT (cache_key) DO UPDATE SET
                value = EXCLUDED.value,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(ttl.as_secs_f64())
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            warn!("Failed to write cache entry {}: {}", key, e);
        }
    }
}
