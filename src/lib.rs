//! Tagcache - an in-process key/value cache engine
//!
//! Provides TTL expiration (lazy checks plus a periodic background sweep),
//! optional LRU bounded eviction, tag-based grouping and invalidation, and
//! usage statistics. Values live in memory only: no persistence, no
//! cross-process sharing.
//!
//! # Example
//! ```no_run
//! use tagcache::{CacheConfig, CapacityPolicy, SharedCache};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache: SharedCache<String> = SharedCache::new(
//!         CacheConfig::default()
//!             .with_std_ttl(300)
//!             .with_capacity(CapacityPolicy::Lru { max_keys: 10_000 }),
//!     );
//!
//!     cache.set("user:1", "alice".to_string(), None).await.unwrap();
//!     cache.tag("user:1", &["users"]).await;
//!
//!     assert_eq!(cache.get("user:1").await, Some("alice".to_string()));
//!     cache.del_by_tag("users").await;
//!
//!     cache.close();
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod shared;
pub mod tasks;

pub use cache::{
    CacheKey, CacheStats, CacheStore, EstimateSize, SizeClass, SizeCosts,
};
pub use config::{CacheConfig, CapacityPolicy};
pub use error::{CacheError, Result};
pub use events::{CacheEvent, EventHook};
pub use shared::{NamespacedCache, SharedCache};
pub use tasks::spawn_sweep_task;
