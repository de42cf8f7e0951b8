//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration, tag indexing and statistics accounting. Every public
//! operation mutates the entry map, recency list, tag index and stats as
//! one unit; callers holding `&mut CacheStore` therefore always observe a
//! consistent whole.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::cache::entry::CacheEntry;
use crate::cache::key::CacheKey;
use crate::cache::lru::LruTracker;
use crate::cache::pattern::GlobPattern;
use crate::cache::size::{estimate_key_size, estimate_value_size, EstimateSize};
use crate::cache::stats::CacheStats;
use crate::cache::tags::TagIndex;
use crate::config::{CacheConfig, CapacityPolicy};
use crate::error::{CacheError, Result};
use crate::events::{CacheEvent, EventHook, EventSink};

// == Cache Store ==
/// In-process key/value cache engine.
///
/// Generic over the stored value type; values are returned by clone.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage with expiration metadata
    entries: HashMap<String, CacheEntry<V>>,
    /// Recency tracker, only consulted under LRU capacity policy
    lru: LruTracker,
    /// Secondary tag -> keys index
    tags: TagIndex,
    /// Usage counters
    stats: CacheStats,
    /// Engine configuration
    config: CacheConfig,
    /// Optional observer for structured events
    events: EventSink,
}

impl<V: Clone + EstimateSize> CacheStore<V> {
    // == Constructors ==
    /// Creates a new CacheStore with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            tags: TagIndex::new(),
            stats: CacheStats::new(),
            config,
            events: EventSink::disabled(),
        }
    }

    /// Creates a new CacheStore that reports activity to an observer.
    pub fn with_events(config: CacheConfig, hook: EventHook) -> Self {
        let mut store = Self::new(config);
        store.events = EventSink::new(hook);
        store
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if the key exists and has not expired; records a
    /// hit or a miss (unless statistics are disabled) and refreshes the
    /// key's recency under LRU policy.
    pub fn get(&mut self, key: impl Into<CacheKey>) -> Option<V> {
        let key = key.into();
        let key = key.as_str();

        if !self.check_live(key) {
            if self.config.enable_stats {
                self.stats.record_miss();
            }
            self.events.emit_with(|| CacheEvent::Miss(key.to_string()));
            return None;
        }

        let value = self.entries.get(key).map(|entry| entry.value.clone());
        if self.config.enable_stats {
            self.stats.record_hit();
        }
        if self.config.capacity.is_lru() {
            self.lru.touch(key);
        }
        self.events.emit_with(|| CacheEvent::Hit(key.to_string()));
        value
    }

    // == Mget ==
    /// Retrieves multiple keys at once.
    ///
    /// Absent or expired keys are silently omitted from the result.
    pub fn mget<K, I>(&mut self, keys: I) -> HashMap<String, V>
    where
        K: Into<CacheKey>,
        I: IntoIterator<Item = K>,
    {
        let mut found = HashMap::new();
        for key in keys {
            let key = key.into();
            if let Some(value) = self.get(key.clone()) {
                found.insert(key.into_string(), value);
            }
        }
        found
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL in seconds.
    ///
    /// `Some(0)` means the entry never expires, `Some(n)` expires `n`
    /// seconds from now, and `None` falls back to the configured standard
    /// TTL. Replacing an existing key updates value and expiry in place.
    /// Inserting into a full store either evicts the least recently used
    /// entry (LRU policy) or fails with [`CacheError::CacheFull`]
    /// (reject policy).
    pub fn set(&mut self, key: impl Into<CacheKey>, value: V, ttl: Option<u64>) -> Result<()> {
        let key = key.into().into_string();
        let ttl = ttl.unwrap_or(self.config.std_ttl);
        let value_size = estimate_value_size(&value, &self.config.size_costs);

        if let Some(entry) = self.entries.get_mut(&key) {
            let old_value_size = entry.value_size;
            entry.value = value;
            entry.value_size = value_size;
            entry.reset_expiry(ttl);
            self.stats.record_replace(old_value_size, value_size);
        } else {
            self.make_room_for(&key, 1)?;

            let key_size = estimate_key_size(&key);
            self.entries
                .insert(key.clone(), CacheEntry::new(value, ttl, key_size, value_size));
            self.stats.record_insert(key_size, value_size);
        }

        if self.config.capacity.is_lru() {
            self.lru.touch(&key);
        }
        self.events.emit_with(|| CacheEvent::Set(key.clone()));
        Ok(())
    }

    // == Mset ==
    /// Stores a batch of entries.
    ///
    /// The capacity check runs against the projected total (current live
    /// count plus net-new keys) before any entry is written, so a rejected
    /// batch leaves the store untouched.
    pub fn mset<K>(&mut self, entries: Vec<(K, V, Option<u64>)>) -> Result<()>
    where
        K: Into<CacheKey>,
    {
        let entries: Vec<(String, V, Option<u64>)> = entries
            .into_iter()
            .map(|(key, value, ttl)| (key.into().into_string(), value, ttl))
            .collect();

        if let CapacityPolicy::Reject { max_keys } = self.config.capacity {
            let mut new_keys: HashSet<&str> = HashSet::new();
            for (key, _, _) in &entries {
                if !self.entries.contains_key(key) {
                    new_keys.insert(key.as_str());
                }
            }
            if self.entries.len() + new_keys.len() > max_keys {
                let key = entries
                    .iter()
                    .map(|(key, _, _)| key)
                    .find(|key| !self.entries.contains_key(*key))
                    .cloned()
                    .unwrap_or_default();
                return Err(CacheError::CacheFull { key });
            }
        }

        for (key, value, ttl) in entries {
            self.set(key, value, ttl)?;
        }
        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key, pruning its tag memberships.
    ///
    /// Returns false for absent keys.
    pub fn del(&mut self, key: impl Into<CacheKey>) -> bool {
        let key = key.into();
        let key = key.as_str();

        if self.remove_entry(key).is_none() {
            return false;
        }
        self.tags.prune_key(key);
        self.events.emit_with(|| CacheEvent::Del(key.to_string()));
        true
    }

    // == Mdel ==
    /// Removes a batch of keys, returning how many actually existed.
    pub fn mdel<K, I>(&mut self, keys: I) -> usize
    where
        K: Into<CacheKey>,
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().map(|key| usize::from(self.del(key))).sum()
    }

    // == Take ==
    /// Atomic get-then-delete: returns the live value and removes the
    /// entry in one step, with no intermediate observable state.
    pub fn take(&mut self, key: impl Into<CacheKey>) -> Option<V> {
        let key = key.into();
        let key = key.as_str();

        if !self.check_live(key) {
            if self.config.enable_stats {
                self.stats.record_miss();
            }
            self.events.emit_with(|| CacheEvent::Miss(key.to_string()));
            return None;
        }

        let entry = self.remove_entry(key)?;
        self.tags.prune_key(key);
        if self.config.enable_stats {
            self.stats.record_hit();
        }
        self.events.emit_with(|| CacheEvent::Hit(key.to_string()));
        self.events.emit_with(|| CacheEvent::Del(key.to_string()));
        Some(entry.value)
    }

    // == Has ==
    /// Existence check honoring expiry; records no statistics and does not
    /// refresh recency.
    pub fn has(&mut self, key: impl Into<CacheKey>) -> bool {
        let key = key.into();
        self.check_live(key.as_str())
    }

    // == TTL ==
    /// Resets or changes an entry's expiry.
    ///
    /// A negative TTL deletes the entry, `0` makes it never expire, and a
    /// positive TTL expires `ttl` seconds from now. Returns false for
    /// absent keys.
    pub fn ttl(&mut self, key: impl Into<CacheKey>, ttl: i64) -> bool {
        let key = key.into();

        if !self.check_live(key.as_str()) {
            return false;
        }
        if ttl < 0 {
            return self.del(key);
        }
        if let Some(entry) = self.entries.get_mut(key.as_str()) {
            entry.reset_expiry(ttl as u64);
            true
        } else {
            false
        }
    }

    // == Get TTL ==
    /// Returns an entry's absolute expiry timestamp in Unix milliseconds.
    ///
    /// `Some(0)` means the entry never expires; `None` means the key is
    /// absent or expired.
    pub fn get_ttl(&mut self, key: impl Into<CacheKey>) -> Option<u64> {
        let key = key.into();

        if !self.check_live(key.as_str()) {
            return None;
        }
        self.entries.get(key.as_str()).map(|entry| entry.expires_at)
    }

    // == Keys ==
    /// Enumerates all live keys. A fresh snapshot is produced per call.
    pub fn keys(&mut self) -> Vec<String> {
        self.collect_keys(None)
    }

    /// Enumerates live keys matching a glob pattern (`*` = any run of
    /// characters, `?` = exactly one).
    pub fn keys_matching(&mut self, pattern: &str) -> Vec<String> {
        self.collect_keys(Some(&GlobPattern::new(pattern)))
    }

    // == Tagging ==
    /// Associates a key with the given tags.
    ///
    /// Returns false (without mutating the index) if the key does not
    /// currently exist.
    pub fn tag<S: AsRef<str>>(&mut self, key: impl Into<CacheKey>, tags: &[S]) -> bool {
        let key = key.into();

        if !self.check_live(key.as_str()) {
            return false;
        }
        self.tags.add(key.as_str(), tags);
        true
    }

    /// Returns the live keys carrying a tag, self-healing stale index
    /// references in the process.
    pub fn keys_by_tag(&mut self, tag: &str) -> Vec<String> {
        let recorded: Vec<String> = self.tags.keys(tag).map(str::to_string).collect();

        let mut live = Vec::new();
        for key in recorded {
            if self.check_live(&key) {
                live.push(key);
            }
        }

        let live_set: HashSet<&str> = live.iter().map(String::as_str).collect();
        self.tags.retain_live(tag, |key| live_set.contains(key));
        live
    }

    /// Deletes every live key carrying a tag through the normal delete
    /// path, then discards the tag's set. Returns the number deleted.
    pub fn del_by_tag(&mut self, tag: &str) -> usize {
        let keys = self.keys_by_tag(tag);
        let deleted = keys.into_iter().filter(|key| self.del(key.as_str())).count();
        self.tags.remove_tag(tag);
        deleted
    }

    // == Flush ==
    /// Clears the store, recency list, tag index and statistics.
    pub fn flush(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.tags.clear();
        self.stats.reset();
        self.events.emit(CacheEvent::Flush);
        debug!("cache flushed");
    }

    // == Stats ==
    /// Returns a snapshot copy of the current statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries in a single bounded pass, regardless of
    /// the delete-on-expire policy. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            let _ = self.remove_entry(&key);
            self.events.emit_with(|| CacheEvent::Expired(key.clone()));
        }
        count
    }

    // == Length ==
    /// Returns the current number of entries, including entries that have
    /// expired but not yet been removed under `delete_on_expire = false`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Internal Helpers ==
    /// Lazy expiry check: returns whether the key holds a live entry.
    ///
    /// Detecting an expired entry emits an `Expired` event and, when
    /// delete-on-expire is active, removes the entry from every structure.
    fn check_live(&mut self, key: &str) -> bool {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return false,
        };

        if expired {
            if self.config.delete_on_expire {
                let _ = self.remove_entry(key);
            }
            self.events.emit_with(|| CacheEvent::Expired(key.to_string()));
            return false;
        }
        true
    }

    /// Removes an entry from the map, recency list and statistics.
    /// Tag pruning and events are the caller's responsibility.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.stats.record_remove(entry.key_size, entry.value_size);
        Some(entry)
    }

    /// Enforces the capacity policy ahead of inserting `net_new` keys.
    /// Under LRU, evicts tail entries until the insert fits; under reject,
    /// fails with the attempted key; unbounded is a no-op.
    fn make_room_for(&mut self, attempted_key: &str, net_new: usize) -> Result<()> {
        match self.config.capacity {
            CapacityPolicy::Unbounded => Ok(()),
            CapacityPolicy::Reject { max_keys } => {
                if self.entries.len() + net_new > max_keys {
                    Err(CacheError::CacheFull {
                        key: attempted_key.to_string(),
                    })
                } else {
                    Ok(())
                }
            }
            CapacityPolicy::Lru { max_keys } => {
                while self.entries.len() + net_new > max_keys {
                    match self.lru.evict_oldest() {
                        Some(victim) => {
                            if let Some(entry) = self.entries.remove(&victim) {
                                self.stats.record_remove(entry.key_size, entry.value_size);
                            }
                            self.events.emit_with(|| CacheEvent::Evicted(victim.clone()));
                            debug!(key = %victim, "evicted least recently used entry");
                        }
                        // No victim left while still over the bound: the
                        // insert can never fit (a zero bound), so refuse it
                        None => {
                            return Err(CacheError::CacheFull {
                                key: attempted_key.to_string(),
                            })
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Shared body of `keys` / `keys_matching`: applies the lazy expiry
    /// check to every entry, then snapshots the surviving keys.
    fn collect_keys(&mut self, pattern: Option<&GlobPattern>) -> Vec<String> {
        let candidates: Vec<String> = self.entries.keys().cloned().collect();

        let mut live = Vec::new();
        for key in candidates {
            if self.check_live(&key) {
                let matched = pattern.map_or(true, |glob| glob.matches(&key));
                if matched {
                    live.push(key);
                }
            }
        }
        live
    }
}
