//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cache entry: the stored value plus expiration metadata and the
/// size estimates captured when the entry was written.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration timestamp (Unix milliseconds), 0 = never expires
    pub expires_at: u64,
    /// Estimated key footprint, captured at insert time
    pub key_size: usize,
    /// Estimated value footprint, captured at insert/replace time
    pub value_size: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - TTL in seconds; `0` means the entry never expires
    /// * `key_size` / `value_size` - Size estimates for statistics
    pub fn new(value: V, ttl_seconds: u64, key_size: usize, value_size: usize) -> Self {
        Self {
            value,
            expires_at: expiry_timestamp(ttl_seconds),
            key_size,
            value_size,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now` (Unix milliseconds).
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to its expiration time. Entries with
    /// `expires_at == 0` never expire.
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at != 0 && now >= self.expires_at
    }

    /// Checks whether the entry has expired as of the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Reset Expiry ==
    /// Replaces the expiration with `now + ttl_seconds` (`0` = never).
    pub fn reset_expiry(&mut self, ttl_seconds: u64) {
        self.expires_at = expiry_timestamp(ttl_seconds);
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Converts a TTL in seconds into an absolute expiry timestamp
/// (Unix milliseconds), preserving `0` as the "never expires" sentinel.
/// Saturates for TTLs too large to represent, pinning the expiry at the
/// far end of the clock instead of wrapping into the past.
pub fn expiry_timestamp(ttl_seconds: u64) -> u64 {
    if ttl_seconds == 0 {
        0
    } else {
        current_timestamp_ms().saturating_add(ttl_seconds.saturating_mul(1000))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), 0, 3, 10);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.expires_at, 0);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), 60, 3, 10);

        assert!(entry.expires_at > current_timestamp_ms());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration_simulated_time() {
        let entry = CacheEntry::new(1u32, 1, 1, 8);

        let now = current_timestamp_ms();
        assert!(!entry.is_expired_at(now));
        // 1.1 simulated seconds later the entry must be gone
        assert!(entry.is_expired_at(now + 1100));
    }

    #[test]
    fn test_infinite_ttl_never_expires() {
        let entry = CacheEntry::new(1u32, 0, 1, 8);

        // Arbitrarily far in simulated time
        assert!(!entry.is_expired_at(u64::MAX));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: "test".to_string(),
            expires_at: now,
            key_size: 4,
            value_size: 4,
        };

        // Expired when current time >= expires_at
        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
    }

    #[test]
    fn test_reset_expiry() {
        let mut entry = CacheEntry::new("v".to_string(), 1, 1, 1);
        let original = entry.expires_at;

        entry.reset_expiry(0);
        assert_eq!(entry.expires_at, 0);

        entry.reset_expiry(3600);
        assert!(entry.expires_at > original);
    }

    #[test]
    fn test_expiry_timestamp_sentinel() {
        assert_eq!(expiry_timestamp(0), 0);
        assert!(expiry_timestamp(5) >= current_timestamp_ms() + 4900);
    }

    #[test]
    fn test_expiry_timestamp_saturates_on_huge_ttl() {
        assert_eq!(expiry_timestamp(u64::MAX), u64::MAX);

        // Still in the future, not wrapped behind the clock
        let entry = CacheEntry::new("v".to_string(), u64::MAX / 1000, 1, 1);
        assert!(!entry.is_expired());
    }
}
