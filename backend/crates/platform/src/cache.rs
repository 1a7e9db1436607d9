//! Expiring Key-Value Cache
//!
//! Cache port for memoized read results and short-lived nonces. Lookups on
//! opaque string keys, values with a TTL. Callers must stay correct when the
//! cache is empty: every cached read path recomputes on miss, and
//! implementations swallow backend failures instead of surfacing them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

/// Cache storage trait
#[trait_variant::make(CacheStore: Send)]
pub trait LocalCacheStore {
    /// Get a value; expired entries are treated as absent
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value with a time-to-live
    async fn set(&self, key: &str, value: String, ttl: Duration);

    /// Remove a value
    async fn delete(&self, key: &str);

    /// Get and remove in one step (one-shot nonces)
    async fn take(&self, key: &str) -> Option<String>;
}

/// Entries above this count trigger an expired-entry sweep on insert
const SWEEP_THRESHOLD: usize = 256;

#[derive(Debug)]
struct CacheEntry {
    value: String,
    expires_at_ms: i64,
}

impl CacheEntry {
    fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

/// In-process cache store
///
/// Shared via internal `Arc`; cloning is cheap and clones observe the same
/// entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now_ms = Self::now_ms();
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now_ms))
            .map(|entry| entry.value.clone())
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let now_ms = Self::now_ms();
        let mut entries = self.entries.lock().await;
        if entries.len() >= SWEEP_THRESHOLD {
            entries.retain(|_, entry| !entry.is_expired(now_ms));
        }
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at_ms: now_ms + ttl.as_millis() as i64,
            },
        );
    }

    async fn delete(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }

    async fn take(&self, key: &str) -> Option<String> {
        let now_ms = Self::now_ms();
        let mut entries = self.entries.lock().await;
        entries
            .remove(key)
            .filter(|entry| !entry.is_expired(now_ms))
            .map(|entry| entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheStore, Duration, MemoryCache};

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache
            .set("key", "value".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("key").await, Some("value".to_string()));
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent() {
        let cache = MemoryCache::new();
        cache
            .set("key", "value".to_string(), Duration::from_millis(0))
            .await;
        assert_eq!(cache.get("key").await, None);
        assert_eq!(cache.take("key").await, None);
    }

    #[tokio::test]
    async fn test_take_is_one_shot() {
        let cache = MemoryCache::new();
        cache
            .set("nonce", "abc123".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.take("nonce").await, Some("abc123".to_string()));
        assert_eq!(cache.take("nonce").await, None);
        assert_eq!(cache.get("nonce").await, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new();
        cache
            .set("key", "value".to_string(), Duration::from_secs(60))
            .await;
        cache.delete("key").await;
        assert_eq!(cache.get("key").await, None);
    }

    #[tokio::test]
    async fn test_overwrite_refreshes_value() {
        let cache = MemoryCache::new();
        cache
            .set("key", "old".to_string(), Duration::from_secs(60))
            .await;
        cache
            .set("key", "new".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("key").await, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = MemoryCache::new();
        let clone = cache.clone();
        cache
            .set("key", "value".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(clone.get("key").await, Some("value".to_string()));
    }
}
