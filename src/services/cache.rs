// src/services/cache.rs
// DOCUMENTATION: Per-category location cache with a fixed freshness window
// PURPOSE: Avoid re-querying the remote store for a category within one hour

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::models::LocationRecord;
use crate::services::clock::{Clock, SystemClock};

/// Entries older than this are ignored and refetched
pub const FRESHNESS_WINDOW_MS: i64 = 60 * 60 * 1000;

const KEY_PREFIX: &str = "locations:";

/// String key-value storage behind the cache (localStorage-shaped)
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> impl Future<Output = Option<String>> + Send;
    fn set_item(&self, key: &str, value: String) -> impl Future<Output = ()> + Send;
    fn remove_item(&self, key: &str) -> impl Future<Output = ()> + Send;
    fn keys(&self) -> impl Future<Output = Vec<String>> + Send;
}

/// Process-local key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().await.get(key).cloned()
    }

    async fn set_item(&self, key: &str, value: String) {
        self.items.write().await.insert(key.to_string(), value);
    }

    async fn remove_item(&self, key: &str) {
        self.items.write().await.remove(key);
    }

    async fn keys(&self) -> Vec<String> {
        self.items.read().await.keys().cloned().collect()
    }
}

/// Serialized form: `{ "timestamp": <epoch ms>, "data": [LocationRecord] }`
#[derive(Debug, Deserialize)]
struct CacheEntry {
    timestamp: i64,
    data: Vec<LocationRecord>,
}

#[derive(Serialize)]
struct CacheEntryRef<'a> {
    timestamp: i64,
    data: &'a [LocationRecord],
}

/// Identifies one fetch for one slug. Only the newest token per slug may
/// write to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchToken {
    pub slug: String,
    pub seq: u64,
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Location cache keyed by category slug
/// DOCUMENTATION: Any decode failure is a miss. Fetch tokens guard
/// against an older, slower fetch overwriting a newer one.
pub struct LocationCache<S = MemoryStore> {
    store: S,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<HashMap<String, u64>>,
    next_seq: AtomicU64,
}

impl LocationCache<MemoryStore> {
    /// In-memory cache on the system clock
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), Arc::new(SystemClock))
    }
}

impl<S: KeyValueStore> LocationCache<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            in_flight: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Storage key for a category slug
    pub fn key_for(slug: &str) -> String {
        format!("{}{}", KEY_PREFIX, slug)
    }

    /// Fresh records for `slug`, or `None` on miss, decode failure or expiry
    pub async fn get(&self, slug: &str) -> Option<Vec<LocationRecord>> {
        let key = Self::key_for(slug);
        let Some(raw) = self.store.get_item(&key).await else {
            log::debug!("Cache MISS for key: {}", key);
            return None;
        };

        let entry = match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Cache entry {} is unreadable, treating as miss: {}", key, e);
                return None;
            }
        };

        if self.is_fresh(entry.timestamp) {
            log::debug!("Cache HIT for key: {}", key);
            Some(entry.data)
        } else {
            log::debug!("Cache EXPIRED for key: {}", key);
            None
        }
    }

    /// Overwrite the entry for `slug`, stamped with the current time
    pub async fn put(&self, slug: &str, records: &[LocationRecord]) {
        let key = Self::key_for(slug);
        let entry = CacheEntryRef {
            timestamp: self.clock.now_millis(),
            data: records,
        };

        match serde_json::to_string(&entry) {
            Ok(serialized) => {
                self.store.set_item(&key, serialized).await;
                log::debug!("Cache SET for key: {} ({} records)", key, records.len());
            }
            Err(e) => log::warn!("Could not serialize cache entry {}: {}", key, e),
        }
    }

    /// Register a new fetch for `slug`, superseding any earlier one
    pub async fn begin_fetch(&self, slug: &str) -> FetchToken {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.in_flight.lock().await.insert(slug.to_string(), seq);
        FetchToken {
            slug: slug.to_string(),
            seq,
        }
    }

    /// Whether `token` is still the newest fetch for its slug
    #[cfg(test)]
    pub async fn is_current(&self, token: &FetchToken) -> bool {
        self.in_flight.lock().await.get(&token.slug) == Some(&token.seq)
    }

    /// Write the result of a fetch if its token is still current.
    /// Returns false when the result was discarded.
    pub async fn commit(&self, token: &FetchToken, records: &[LocationRecord]) -> bool {
        let mut in_flight = self.in_flight.lock().await;
        if in_flight.get(&token.slug) != Some(&token.seq) {
            log::info!(
                "Discarding stale fetch #{} for '{}' ({} records)",
                token.seq,
                token.slug,
                records.len()
            );
            return false;
        }

        self.put(&token.slug, records).await;
        in_flight.remove(&token.slug);
        true
    }

    /// Drop the outstanding fetch for `slug`; its completion will be ignored
    pub async fn cancel(&self, slug: &str) {
        if let Some(seq) = self.in_flight.lock().await.remove(slug) {
            log::debug!("Cancelled in-flight fetch #{} for '{}'", seq, slug);
        }
    }

    /// Forget a failed fetch without touching a newer one for the same slug
    pub async fn release(&self, token: &FetchToken) {
        let mut in_flight = self.in_flight.lock().await;
        if in_flight.get(&token.slug) == Some(&token.seq) {
            in_flight.remove(&token.slug);
        }
    }

    /// Remove the entry for `slug` and cancel any fetch still running for it
    pub async fn invalidate(&self, slug: &str) {
        self.cancel(slug).await;
        self.store.remove_item(&Self::key_for(slug)).await;
        log::info!("Cache invalidated for '{}'", slug);
    }

    /// Clear expired or unreadable entries
    pub async fn cleanup(&self) {
        let keys = self.cache_keys().await;
        let before_count = keys.len();
        let mut removed = 0;

        for key in keys {
            if !self.entry_is_active(&key).await {
                self.store.remove_item(&key).await;
                removed += 1;
            }
        }

        if removed > 0 {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                removed,
                before_count - removed
            );
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let keys = self.cache_keys().await;
        let total = keys.len();
        let mut active = 0;
        for key in &keys {
            if self.entry_is_active(key).await {
                active += 1;
            }
        }

        CacheStats {
            total_entries: total,
            expired_entries: total - active,
            active_entries: active,
        }
    }

    /// Clear all cache entries
    pub async fn clear(&self) {
        let keys = self.cache_keys().await;
        let count = keys.len();
        for key in keys {
            self.store.remove_item(&key).await;
        }
        log::info!("Cache cleared: {} entries removed", count);
    }

    /// Entries stamped in the future, or too far back to subtract, are stale
    fn is_fresh(&self, timestamp: i64) -> bool {
        match self.clock.now_millis().checked_sub(timestamp) {
            Some(age) => (0..FRESHNESS_WINDOW_MS).contains(&age),
            None => false,
        }
    }

    async fn cache_keys(&self) -> Vec<String> {
        self.store
            .keys()
            .await
            .into_iter()
            .filter(|key| key.starts_with(KEY_PREFIX))
            .collect()
    }

    async fn entry_is_active(&self, key: &str) -> bool {
        match self.store.get_item(key).await {
            Some(raw) => serde_json::from_str::<CacheEntry>(&raw)
                .map(|entry| self.is_fresh(entry.timestamp))
                .unwrap_or(false),
            None => false,
        }
    }
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<LocationCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}
