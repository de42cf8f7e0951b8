//! End-to-end engine scenarios
//!
//! Exercises the shared async facade the way drivers and patterns consume
//! it: expiry timing, LRU recency, tag invalidation, batch operations and
//! lifecycle teardown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tagcache::{
    CacheConfig, CacheError, CacheEvent, CapacityPolicy, SharedCache,
};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_test_writer()
        .try_init();
}

fn engine(config: CacheConfig) -> SharedCache<String> {
    init_tracing();
    SharedCache::new(config)
}

#[tokio::test]
async fn ttl_entry_expires_and_records_miss() {
    let cache = engine(CacheConfig::default().with_check_period(0));

    cache.set("x", "v".to_string(), Some(1)).await.unwrap();
    assert_eq!(cache.get("x").await, Some("v".to_string()));

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(cache.get("x").await, None);

    let stats = cache.stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn infinite_ttl_entry_survives() {
    let cache = engine(CacheConfig::default().with_std_ttl(1).with_check_period(0));

    cache.set("pinned", "v".to_string(), Some(0)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1200)).await;

    assert!(cache.has("pinned").await);
    assert_eq!(cache.get_ttl("pinned").await, Some(0));
}

#[tokio::test]
async fn lru_bound_keeps_most_recent_inserts() {
    let cache = engine(
        CacheConfig::default()
            .with_check_period(0)
            .with_capacity(CapacityPolicy::Lru { max_keys: 3 }),
    );

    for i in 0..7u32 {
        cache.set(i, i.to_string(), None).await.unwrap();
    }

    let mut keys = cache.keys().await;
    keys.sort();
    assert_eq!(keys, vec!["4", "5", "6"]);
}

#[tokio::test]
async fn reading_refreshes_recency_before_eviction() {
    let cache = engine(
        CacheConfig::default()
            .with_check_period(0)
            .with_capacity(CapacityPolicy::Lru { max_keys: 3 }),
    );

    cache.set("a", "1".to_string(), None).await.unwrap();
    cache.set("b", "2".to_string(), None).await.unwrap();
    cache.set("c", "3".to_string(), None).await.unwrap();

    // Reading a moves it to the head; inserting d evicts b
    assert!(cache.get("a").await.is_some());
    cache.set("d", "4".to_string(), None).await.unwrap();

    let mut keys = cache.keys().await;
    keys.sort();
    assert_eq!(keys, vec!["a", "c", "d"]);
    assert!(!cache.has("b").await);
}

#[tokio::test]
async fn bounded_store_without_eviction_rejects_overflow() {
    let cache = engine(
        CacheConfig::default()
            .with_check_period(0)
            .with_capacity(CapacityPolicy::Reject { max_keys: 1 }),
    );

    cache.set("a", "1".to_string(), None).await.unwrap();
    let err = cache.set("b", "2".to_string(), None).await.unwrap_err();

    assert_eq!(err, CacheError::CacheFull { key: "b".to_string() });
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn tagged_keys_invalidate_together() {
    let cache = engine(CacheConfig::default().with_check_period(0));

    cache.set("user:1", "a".to_string(), None).await.unwrap();
    cache.set("user:2", "b".to_string(), None).await.unwrap();
    cache.set("post:1", "c".to_string(), None).await.unwrap();

    assert!(cache.tag("user:1", &["users"]).await);
    assert!(cache.tag("user:2", &["users"]).await);

    let mut tagged = cache.keys_by_tag("users").await;
    tagged.sort();
    assert_eq!(tagged, vec!["user:1", "user:2"]);

    assert_eq!(cache.del_by_tag("users").await, 2);
    assert!(cache.keys_by_tag("users").await.is_empty());
    assert!(cache.has("post:1").await);
}

#[tokio::test]
async fn tag_membership_cleared_by_delete() {
    let cache = engine(CacheConfig::default().with_check_period(0));

    cache.set("k", "v".to_string(), None).await.unwrap();
    cache.tag("k", &["t"]).await;
    cache.del("k").await;

    assert!(cache.keys_by_tag("t").await.is_empty());
}

#[tokio::test]
async fn mset_then_mdel_reports_actual_deletions() {
    let cache = engine(CacheConfig::default().with_check_period(0));

    cache
        .mset(vec![("a", "1".to_string(), None), ("b", "2".to_string(), None)])
        .await
        .unwrap();

    // c was never present
    assert_eq!(cache.mdel(["a", "b", "c"]).await, 2);
}

#[tokio::test]
async fn flush_resets_stats_and_keyspace() {
    let cache = engine(CacheConfig::default().with_check_period(0));

    cache.set("a", "1".to_string(), None).await.unwrap();
    cache.get("a").await;
    cache.get("zzz").await;
    cache.tag("a", &["t"]).await;

    cache.flush().await;

    let stats = cache.stats().await;
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.key_count, 0);
    assert_eq!(stats.key_bytes, 0);
    assert_eq!(stats.value_bytes, 0);
    assert!(cache.keys().await.is_empty());
}

#[tokio::test]
async fn take_is_get_plus_delete() {
    let cache = engine(CacheConfig::default().with_check_period(0));

    cache.set("once", "v".to_string(), None).await.unwrap();

    assert_eq!(cache.take("once").await, Some("v".to_string()));
    assert_eq!(cache.take("once").await, None);
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn background_sweep_removes_expired_entries() {
    let cache = engine(CacheConfig::default().with_check_period(1));

    cache.set("soon", "v".to_string(), Some(1)).await.unwrap();
    cache.set("later", "v".to_string(), Some(3600)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;

    // The sweep removed the entry without any read touching it
    assert_eq!(cache.len().await, 1);
    assert!(cache.has("later").await);

    cache.close();
}

#[tokio::test]
async fn sweep_emits_expired_events() {
    init_tracing();

    let seen: Arc<Mutex<Vec<CacheEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);

    let cache: SharedCache<String> = SharedCache::with_events(
        CacheConfig::default().with_check_period(1),
        Arc::new(move |event: &CacheEvent| {
            if matches!(event, CacheEvent::Expired(_)) {
                seen_clone.lock().unwrap().push(event.clone());
            }
        }),
    );

    cache.set("soon", "v".to_string(), Some(1)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    cache.close();

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec![CacheEvent::Expired("soon".to_string())]);
}

#[tokio::test]
async fn close_prevents_further_sweep_passes() {
    let cache = engine(CacheConfig::default().with_check_period(1));

    cache.set("soon", "v".to_string(), Some(1)).await.unwrap();
    cache.close();

    tokio::time::sleep(Duration::from_millis(2500)).await;

    // No sweep ran, so the entry is still physically stored. Check len
    // first: the lazy check inside has() removes the expired entry.
    assert_eq!(cache.len().await, 1);
    assert!(!cache.has("soon").await);
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn delete_on_expire_disabled_defers_removal_to_sweep() {
    let cache: SharedCache<String> = engine(
        CacheConfig::default()
            .with_check_period(0)
            .with_delete_on_expire(false),
    );

    cache.set("soon", "v".to_string(), Some(1)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;

    // Readers see the entry as absent while stats still count it
    assert_eq!(cache.get("soon").await, None);
    assert_eq!(cache.stats().await.key_count, 1);

    // A manual pass (standing in for the sweep) removes it
    assert_eq!(cache.cleanup_expired().await, 1);
    assert_eq!(cache.stats().await.key_count, 0);
}
