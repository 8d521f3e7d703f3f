use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

struct Entry {
    value: Value,
    expires_at: Instant,
}

/// In-process fallback cache with per-key expiry timestamps.
///
/// Expiry is lazy: an expired entry is treated as absent on read and stays in
/// memory until the next `set` overwrites it. The lock makes the map safe
/// under multi-threaded workers.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                debug!("Cache entry for {} has expired", key);
                None
            }
            None => None,
        }
    }

    pub async fn set(&self, key: &str, value: &Value, ttl: Duration) {
        let entry = Entry {
            value: value.clone(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}
