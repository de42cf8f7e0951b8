//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, optional LRU eviction,
//! tag-based invalidation and usage statistics.

mod entry;
mod key;
mod lru;
mod pattern;
mod size;
mod stats;
mod store;
mod tags;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::CacheKey;
pub use lru::LruTracker;
pub use pattern::GlobPattern;
pub use size::{estimate_key_size, estimate_value_size, EstimateSize, SizeClass, SizeCosts};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use tags::TagIndex;
