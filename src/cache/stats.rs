//! Cache Statistics Module
//!
//! Running counters for cache usage: hits, misses, live entry count and
//! estimated key/value footprints. Counters are updated transactionally
//! with every store mutation; `getStats` hands out a snapshot copy so
//! callers can never mutate the live counters.

use serde::Serialize;

// == Cache Stats ==
/// Cache usage counters.
///
/// Byte figures come from the approximate size estimator and are for
/// observability only. With `delete_on_expire = false`, entries that have
/// expired but not yet been swept remain counted until the next sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of reads that found a live entry
    pub hits: u64,
    /// Number of reads that found nothing
    pub misses: u64,
    /// Current number of entries in the store
    pub key_count: usize,
    /// Estimated total footprint of all keys
    pub key_bytes: usize,
    /// Estimated total footprint of all values
    pub value_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been recorded.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Entry Accounting ==
    /// Accounts for a newly inserted entry.
    pub fn record_insert(&mut self, key_size: usize, value_size: usize) {
        self.key_count += 1;
        self.key_bytes += key_size;
        self.value_bytes += value_size;
    }

    /// Accounts for a removed entry. Must be called exactly once per
    /// removal, with the sizes captured when the entry was written.
    pub fn record_remove(&mut self, key_size: usize, value_size: usize) {
        self.key_count = self.key_count.saturating_sub(1);
        self.key_bytes = self.key_bytes.saturating_sub(key_size);
        self.value_bytes = self.value_bytes.saturating_sub(value_size);
    }

    /// Accounts for a value replaced in place (key count unchanged).
    pub fn record_replace(&mut self, old_value_size: usize, new_value_size: usize) {
        self.value_bytes = self.value_bytes.saturating_sub(old_value_size) + new_value_size;
    }

    // == Reset ==
    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
