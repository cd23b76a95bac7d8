//! Versioned TTL cache for arrival list results.
//!
//! Keys are prefixed with the current version. Any write bumps the version,
//! which orphans every entry cached before it; orphans age out with the TTL.

use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Clone)]
pub struct ArrivalsCache {
    ttl: Duration,
    inner: Arc<Mutex<CacheInner>>,
}

struct CacheInner {
    version: u64,
    entries: HashMap<String, CacheEntry>,
}

struct CacheEntry {
    expires_at: Instant,
    payload: String,
}

impl ArrivalsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Arc::new(Mutex::new(CacheInner {
                version: 0,
                entries: HashMap::new(),
            })),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn version(&self) -> u64 {
        self.inner.lock().await.version
    }

    pub async fn get<T: DeserializeOwned>(&self, suffix: &str) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }

        let inner = self.inner.lock().await;
        let entry = inner.entries.get(&versioned_key(inner.version, suffix))?;
        if entry.expires_at <= Instant::now() {
            return None;
        }

        match serde_json::from_str(&entry.payload) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("discarding unreadable cache entry {suffix}: {err}");
                None
            }
        }
    }

    /// Stores `value` under the key for `version`. The write is dropped when
    /// the version has moved on, since `value` was computed before that write.
    pub async fn set_at<T: Serialize>(&self, version: u64, suffix: &str, value: &T) {
        if !self.is_enabled() {
            return;
        }

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("skipping cache write for {suffix}: {err}");
                return;
            }
        };

        let now = Instant::now();
        let mut inner = self.inner.lock().await;
        if inner.version != version {
            return;
        }
        inner.entries.retain(|_, entry| entry.expires_at > now);
        let key = versioned_key(version, suffix);
        inner.entries.insert(
            key,
            CacheEntry {
                expires_at: now + self.ttl,
                payload,
            },
        );
    }

    pub async fn bump_version(&self) {
        let mut inner = self.inner.lock().await;
        inner.version = inner.version.wrapping_add(1);
    }
}

fn versioned_key(version: u64, suffix: &str) -> String {
    format!("arrivals:{version:x}:{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_what_was_set() {
        let cache = ArrivalsCache::new(Duration::from_secs(60));
        assert_eq!(cache.get::<Vec<u32>>("a").await, None);

        cache.set_at(0, "a", &vec![1u32, 2, 3]).await;
        assert_eq!(cache.get::<Vec<u32>>("a").await, Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<Vec<u32>>("b").await, None);
    }

    #[tokio::test]
    async fn bump_invalidates_previous_entries() {
        let cache = ArrivalsCache::new(Duration::from_secs(60));
        let before = cache.version().await;
        cache.set_at(before, "a", &"stale").await;

        cache.bump_version().await;
        let after = cache.version().await;
        assert_ne!(after, before);
        assert_eq!(cache.get::<String>("a").await, None);

        cache.set_at(after, "a", &"fresh").await;
        assert_eq!(cache.get::<String>("a").await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = ArrivalsCache::new(Duration::from_millis(20));
        cache.set_at(0, "a", &1u8).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get::<u8>("a").await, None);
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let cache = ArrivalsCache::new(Duration::ZERO);
        assert!(!cache.is_enabled());
        cache.set_at(0, "a", &1u8).await;
        assert_eq!(cache.get::<u8>("a").await, None);
    }

    #[tokio::test]
    async fn write_after_concurrent_bump_is_dropped() {
        let cache = ArrivalsCache::new(Duration::from_secs(60));
        let seen = cache.version().await;

        // A write lands between reading the version and storing the result.
        cache.bump_version().await;
        cache.set_at(seen, "list", &vec!["old"]).await;

        assert_eq!(cache.get::<Vec<String>>("list").await, None);
    }
}
