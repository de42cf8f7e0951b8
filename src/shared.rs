//! Shared Engine Facade
//!
//! Wraps a [`CacheStore`] in `Arc<RwLock<_>>` for concurrent use, spawns
//! the background expiry sweep, and exposes the full engine contract as
//! async operations. One lock guards the entry map, recency list, tag
//! index and statistics as a single critical section; the sweep acquires
//! the same lock as any other mutator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheKey, CacheStats, CacheStore, EstimateSize};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::events::EventHook;
use crate::tasks::spawn_sweep_task;

// == Shared Cache ==
/// Cloneable handle to a cache engine shared across tasks.
///
/// Constructed with explicit options and torn down via [`close`], which
/// stops the sweep timer; no further sweep passes run afterward.
///
/// [`close`]: SharedCache::close
#[derive(Debug)]
pub struct SharedCache<V> {
    /// Thread-safe engine; one lock covers all internal structures
    store: Arc<RwLock<CacheStore<V>>>,
    /// Sweep task handle, taken out on close
    sweeper: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<V: Clone + EstimateSize + Send + Sync + 'static> SharedCache<V> {
    // == Constructors ==
    /// Creates a shared engine from configuration, spawning the expiry
    /// sweep when a non-zero check period is configured.
    ///
    /// Must be called within a tokio runtime when the sweep is enabled.
    pub fn new(config: CacheConfig) -> Self {
        let check_period = config.check_period;
        Self::wrap(CacheStore::new(config), check_period)
    }

    /// Creates a shared engine that reports activity to an observer.
    pub fn with_events(config: CacheConfig, hook: EventHook) -> Self {
        let check_period = config.check_period;
        Self::wrap(CacheStore::with_events(config, hook), check_period)
    }

    fn wrap(store: CacheStore<V>, check_period: u64) -> Self {
        let store = Arc::new(RwLock::new(store));
        let sweeper = spawn_sweep_task(Arc::clone(&store), check_period);
        Self {
            store,
            sweeper: Arc::new(Mutex::new(sweeper)),
        }
    }

    // == Operations ==
    /// See [`CacheStore::get`].
    pub async fn get(&self, key: impl Into<CacheKey>) -> Option<V> {
        self.store.write().await.get(key)
    }

    /// See [`CacheStore::mget`].
    pub async fn mget<K, I>(&self, keys: I) -> HashMap<String, V>
    where
        K: Into<CacheKey>,
        I: IntoIterator<Item = K>,
    {
        self.store.write().await.mget(keys)
    }

    /// See [`CacheStore::set`].
    pub async fn set(&self, key: impl Into<CacheKey>, value: V, ttl: Option<u64>) -> Result<()> {
        self.store.write().await.set(key, value, ttl)
    }

    /// See [`CacheStore::mset`]. The whole batch applies under one lock
    /// acquisition, so no other caller observes it half-applied.
    pub async fn mset<K: Into<CacheKey>>(&self, entries: Vec<(K, V, Option<u64>)>) -> Result<()> {
        self.store.write().await.mset(entries)
    }

    /// See [`CacheStore::del`].
    pub async fn del(&self, key: impl Into<CacheKey>) -> bool {
        self.store.write().await.del(key)
    }

    /// See [`CacheStore::mdel`].
    pub async fn mdel<K, I>(&self, keys: I) -> usize
    where
        K: Into<CacheKey>,
        I: IntoIterator<Item = K>,
    {
        self.store.write().await.mdel(keys)
    }

    /// See [`CacheStore::take`]. Get and delete happen under one lock
    /// acquisition with no intermediate observable state.
    pub async fn take(&self, key: impl Into<CacheKey>) -> Option<V> {
        self.store.write().await.take(key)
    }

    /// See [`CacheStore::has`].
    pub async fn has(&self, key: impl Into<CacheKey>) -> bool {
        self.store.write().await.has(key)
    }

    /// See [`CacheStore::ttl`].
    pub async fn ttl(&self, key: impl Into<CacheKey>, ttl: i64) -> bool {
        self.store.write().await.ttl(key, ttl)
    }

    /// See [`CacheStore::get_ttl`].
    pub async fn get_ttl(&self, key: impl Into<CacheKey>) -> Option<u64> {
        self.store.write().await.get_ttl(key)
    }

    /// See [`CacheStore::keys`].
    pub async fn keys(&self) -> Vec<String> {
        self.store.write().await.keys()
    }

    /// See [`CacheStore::keys_matching`].
    pub async fn keys_matching(&self, pattern: &str) -> Vec<String> {
        self.store.write().await.keys_matching(pattern)
    }

    /// See [`CacheStore::tag`].
    pub async fn tag<S: AsRef<str>>(&self, key: impl Into<CacheKey>, tags: &[S]) -> bool {
        self.store.write().await.tag(key, tags)
    }

    /// See [`CacheStore::keys_by_tag`].
    pub async fn keys_by_tag(&self, tag: &str) -> Vec<String> {
        self.store.write().await.keys_by_tag(tag)
    }

    /// See [`CacheStore::del_by_tag`].
    pub async fn del_by_tag(&self, tag: &str) -> usize {
        self.store.write().await.del_by_tag(tag)
    }

    /// See [`CacheStore::flush`].
    pub async fn flush(&self) {
        self.store.write().await.flush();
    }

    /// See [`CacheStore::stats`].
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// See [`CacheStore::cleanup_expired`]. Exposed so callers with the
    /// sweep disabled can drive their own passes.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    /// Current entry count.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Namespacing ==
    /// Returns a thin key-rewriting view over this engine.
    ///
    /// The view shares the underlying store and accounting; it owns no
    /// separate state beyond its prefix.
    pub fn namespaced(&self, prefix: impl Into<String>) -> NamespacedCache<V> {
        NamespacedCache {
            cache: self.clone(),
            prefix: prefix.into(),
        }
    }

    // == Close ==
    /// Stops the sweep timer. Idempotent; after this returns, no further
    /// sweep passes fire. Entries remain readable until the handle drops.
    pub fn close(&self) {
        let handle = self
            .sweeper
            .lock()
            .map(|mut sweeper| sweeper.take())
            .unwrap_or(None);
        if let Some(handle) = handle {
            handle.abort();
            info!("cache engine closed, expiry sweep stopped");
        }
    }
}

// == Namespaced Cache ==
/// Key-rewriting view over a [`SharedCache`].
///
/// Every key is prefixed with `<prefix>:` before hitting the shared
/// store; `keys` strips the prefix again. No accounting is duplicated.
#[derive(Debug, Clone)]
pub struct NamespacedCache<V> {
    cache: SharedCache<V>,
    prefix: String,
}

impl<V: Clone + EstimateSize + Send + Sync + 'static> NamespacedCache<V> {
    fn rewrite(&self, key: impl Into<CacheKey>) -> String {
        format!("{}:{}", self.prefix, key.into())
    }

    /// Namespace-scoped [`SharedCache::get`].
    pub async fn get(&self, key: impl Into<CacheKey>) -> Option<V> {
        self.cache.get(self.rewrite(key)).await
    }

    /// Namespace-scoped [`SharedCache::set`].
    pub async fn set(&self, key: impl Into<CacheKey>, value: V, ttl: Option<u64>) -> Result<()> {
        self.cache.set(self.rewrite(key), value, ttl).await
    }

    /// Namespace-scoped [`SharedCache::del`].
    pub async fn del(&self, key: impl Into<CacheKey>) -> bool {
        self.cache.del(self.rewrite(key)).await
    }

    /// Namespace-scoped [`SharedCache::has`].
    pub async fn has(&self, key: impl Into<CacheKey>) -> bool {
        self.cache.has(self.rewrite(key)).await
    }

    /// Namespace-scoped [`SharedCache::take`].
    pub async fn take(&self, key: impl Into<CacheKey>) -> Option<V> {
        self.cache.take(self.rewrite(key)).await
    }

    /// Namespace-scoped [`SharedCache::ttl`].
    pub async fn ttl(&self, key: impl Into<CacheKey>, ttl: i64) -> bool {
        self.cache.ttl(self.rewrite(key), ttl).await
    }

    /// Namespace-scoped [`SharedCache::get_ttl`].
    pub async fn get_ttl(&self, key: impl Into<CacheKey>) -> Option<u64> {
        self.cache.get_ttl(self.rewrite(key)).await
    }

    /// Lists this namespace's live keys, prefixes stripped.
    pub async fn keys(&self) -> Vec<String> {
        let marker = format!("{}:", self.prefix);
        self.cache
            .keys()
            .await
            .into_iter()
            .filter_map(|key| key.strip_prefix(&marker).map(str::to_string))
            .collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SharedCache<String> {
        // No sweep in unit tests; scenarios cover it separately
        SharedCache::new(CacheConfig::default().with_check_period(0))
    }

    #[tokio::test]
    async fn test_shared_roundtrip() {
        let cache = engine();

        cache.set("k", "v".to_string(), None).await.unwrap();
        assert_eq!(cache.get("k").await, Some("v".to_string()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_shared_handles_see_same_store() {
        let cache = engine();
        let other = cache.clone();

        cache.set("k", "v".to_string(), None).await.unwrap();
        assert_eq!(other.get("k").await, Some("v".to_string()));

        other.flush().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let cache = engine();
        cache.close();
        cache.close();
    }

    #[tokio::test]
    async fn test_close_stops_sweeper() {
        let cache: SharedCache<String> =
            SharedCache::new(CacheConfig::default().with_check_period(1));

        cache.set("soon", "v".to_string(), Some(1)).await.unwrap();
        cache.close();

        // With the sweep stopped only lazy checks run; the entry stays
        // physically present even though it is reported absent.
        tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
        assert_eq!(cache.len().await, 1);
        assert!(!cache.has("soon").await);
    }

    #[tokio::test]
    async fn test_namespaced_view_shares_store() {
        let cache = engine();
        let users = cache.namespaced("users");

        users.set("1", "alice".to_string(), None).await.unwrap();

        // One store, one accounting: the shared view sees the full key
        assert_eq!(cache.get("users:1").await, Some("alice".to_string()));
        assert_eq!(cache.stats().await.key_count, 1);

        assert_eq!(users.get("1").await, Some("alice".to_string()));
        assert_eq!(users.keys().await, vec!["1"]);

        assert!(users.del("1").await);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_namespaced_keys_exclude_other_namespaces() {
        let cache = engine();
        let users = cache.namespaced("users");
        let posts = cache.namespaced("posts");

        users.set("1", "a".to_string(), None).await.unwrap();
        posts.set("9", "b".to_string(), None).await.unwrap();
        cache.set("plain", "c".to_string(), None).await.unwrap();

        assert_eq!(users.keys().await, vec!["1"]);
        assert_eq!(posts.keys().await, vec!["9"]);
        assert_eq!(cache.keys().await.len(), 3);
    }
}
