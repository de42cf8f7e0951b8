//! Configuration Module
//!
//! Explicit engine configuration constructed by the caller; no process-wide
//! implicit instance. Values can also be loaded from environment variables
//! with sensible defaults.

use std::env;

use crate::cache::SizeCosts;

// == Capacity Policy ==
/// Bounding policy for the number of entries the store may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// No bound; pure hash-map mode, no recency list is maintained.
    Unbounded,
    /// Hard bound without eviction: an insert that would exceed `max_keys`
    /// fails with a cache-full error.
    Reject {
        /// Maximum number of entries allowed
        max_keys: usize,
    },
    /// Bound enforced by silently evicting the least recently used entry.
    Lru {
        /// Maximum number of entries allowed
        max_keys: usize,
    },
}

impl CapacityPolicy {
    /// Returns the configured maximum key count, if any.
    pub fn max_keys(&self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Reject { max_keys } | Self::Lru { max_keys } => Some(*max_keys),
        }
    }

    /// Returns true when LRU eviction is active.
    pub fn is_lru(&self) -> bool {
        matches!(self, Self::Lru { .. })
    }
}

// == Cache Config ==
/// Engine configuration parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Standard TTL in seconds applied when `set` is called without an
    /// explicit TTL. `0` means entries never expire by default.
    pub std_ttl: u64,
    /// Interval in seconds between background expiry sweeps.
    /// `0` disables the sweep entirely.
    pub check_period: u64,
    /// Whether the lazy expiry check on the read path physically removes
    /// expired entries (default: true). When false, expired entries are
    /// reported absent but only the sweep removes them.
    pub delete_on_expire: bool,
    /// Entry-count bounding policy.
    pub capacity: CapacityPolicy,
    /// Whether hit/miss statistics are recorded on reads.
    pub enable_stats: bool,
    /// Per-shape constants for the approximate size estimator.
    pub size_costs: SizeCosts,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STD_TTL` - Standard TTL in seconds, 0 = never expire (default: 0)
    /// - `CHECK_PERIOD` - Sweep interval in seconds, 0 = disabled (default: 600)
    /// - `DELETE_ON_EXPIRE` - Remove expired entries on read (default: true)
    /// - `MAX_KEYS` - Maximum entry count; unset = unbounded
    /// - `LRU_EVICTION` - With `MAX_KEYS`, evict instead of rejecting (default: false)
    pub fn from_env() -> Self {
        let max_keys: Option<usize> = env::var("MAX_KEYS").ok().and_then(|v| v.parse().ok());
        let lru: bool = env::var("LRU_EVICTION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        let capacity = match max_keys {
            Some(max_keys) if lru => CapacityPolicy::Lru { max_keys },
            Some(max_keys) => CapacityPolicy::Reject { max_keys },
            None => CapacityPolicy::Unbounded,
        };

        Self {
            std_ttl: env::var("STD_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            check_period: env::var("CHECK_PERIOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            delete_on_expire: env::var("DELETE_ON_EXPIRE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            capacity,
            enable_stats: true,
            size_costs: SizeCosts::default(),
        }
    }

    /// Sets the standard TTL in seconds (`0` = never expire).
    pub fn with_std_ttl(mut self, std_ttl: u64) -> Self {
        self.std_ttl = std_ttl;
        self
    }

    /// Sets the sweep interval in seconds (`0` disables the sweep).
    pub fn with_check_period(mut self, check_period: u64) -> Self {
        self.check_period = check_period;
        self
    }

    /// Sets the entry-count bounding policy.
    pub fn with_capacity(mut self, capacity: CapacityPolicy) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enables or disables lazy removal of expired entries on read.
    pub fn with_delete_on_expire(mut self, delete_on_expire: bool) -> Self {
        self.delete_on_expire = delete_on_expire;
        self
    }

    /// Enables or disables hit/miss statistics recording.
    pub fn with_stats(mut self, enable_stats: bool) -> Self {
        self.enable_stats = enable_stats;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            std_ttl: 0,
            check_period: 600,
            delete_on_expire: true,
            capacity: CapacityPolicy::Unbounded,
            enable_stats: true,
            size_costs: SizeCosts::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.std_ttl, 0);
        assert_eq!(config.check_period, 600);
        assert!(config.delete_on_expire);
        assert_eq!(config.capacity, CapacityPolicy::Unbounded);
        assert!(config.enable_stats);
    }

    #[test]
    fn test_config_builders() {
        let config = CacheConfig::default()
            .with_std_ttl(300)
            .with_check_period(0)
            .with_capacity(CapacityPolicy::Lru { max_keys: 10 })
            .with_delete_on_expire(false)
            .with_stats(false);

        assert_eq!(config.std_ttl, 300);
        assert_eq!(config.check_period, 0);
        assert_eq!(config.capacity, CapacityPolicy::Lru { max_keys: 10 });
        assert!(!config.delete_on_expire);
        assert!(!config.enable_stats);
    }

    #[test]
    fn test_capacity_policy_accessors() {
        assert_eq!(CapacityPolicy::Unbounded.max_keys(), None);
        assert_eq!(CapacityPolicy::Reject { max_keys: 5 }.max_keys(), Some(5));
        assert_eq!(CapacityPolicy::Lru { max_keys: 5 }.max_keys(), Some(5));

        assert!(CapacityPolicy::Lru { max_keys: 5 }.is_lru());
        assert!(!CapacityPolicy::Reject { max_keys: 5 }.is_lru());
        assert!(!CapacityPolicy::Unbounded.is_lru());
    }

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("STD_TTL");
        env::remove_var("CHECK_PERIOD");
        env::remove_var("DELETE_ON_EXPIRE");
        env::remove_var("MAX_KEYS");
        env::remove_var("LRU_EVICTION");

        let config = CacheConfig::from_env();
        assert_eq!(config.std_ttl, 0);
        assert_eq!(config.check_period, 600);
        assert!(config.delete_on_expire);
        assert_eq!(config.capacity, CapacityPolicy::Unbounded);
    }
}
