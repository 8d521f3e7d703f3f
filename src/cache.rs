pub mod memory;
pub mod shared;

use std::time::Duration;

use serde_json::Value;
use sqlx::PgPool;

pub use memory::MemoryCache;
pub use shared::SharedCache;

/// TTL key/value store for upstream payloads.
///
/// Backed by the shared Postgres table when a database is configured, and by
/// an in-process map otherwise. The backend is picked once at startup; call
/// sites never branch on it. Both backends store `serde_json::Value` so a
/// payload written by either is fully reconstructible by the other, including
/// nested time-series arrays.
///
/// Cache failures are never surfaced to callers: a broken `get` is a miss and
/// a broken `set` is a no-op, logged and forgotten.
#[derive(Clone)]
pub enum CacheStore {
    Shared(SharedCache),
    Memory(MemoryCache),
}

impl CacheStore {
    pub fn shared(pool: PgPool) -> Self {
        CacheStore::Shared(SharedCache::new(pool))
    }

    pub fn memory() -> Self {
        CacheStore::Memory(MemoryCache::new())
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        match self {
            CacheStore::Shared(cache) => cache.get(key).await,
            CacheStore::Memory(cache) => cache.get(key).await,
        }
    }

    pub async fn set(&self, key: &str, value: &Value, ttl: Duration) {
        match self {
            CacheStore::Shared(cache) => cache.set(key, value, ttl).await,
            CacheStore::Memory(cache) => cache.set(key, value, ttl).await,
        }
    }
}
