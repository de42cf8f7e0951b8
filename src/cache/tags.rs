//! Tag Index Module
//!
//! Secondary index mapping an arbitrary tag string to the set of keys
//! carrying that tag. The index may briefly hold references to keys that
//! were expired or evicted; readers filter against the live entry set and
//! the index self-heals lazily, while explicit deletion prunes eagerly.

use std::collections::{HashMap, HashSet};

// == Tag Index ==
/// Maps tag -> set of canonical keys.
#[derive(Debug, Default)]
pub struct TagIndex {
    tags: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    // == Constructor ==
    /// Creates a new empty tag index.
    pub fn new() -> Self {
        Self {
            tags: HashMap::new(),
        }
    }

    // == Add ==
    /// Adds a key under each of the given tags, creating tag sets on
    /// first use.
    pub fn add<S: AsRef<str>>(&mut self, key: &str, tags: &[S]) {
        for tag in tags {
            self.tags
                .entry(tag.as_ref().to_string())
                .or_default()
                .insert(key.to_string());
        }
    }

    // == Keys For Tag ==
    /// Returns the recorded key set for a tag, unfiltered.
    ///
    /// Callers are responsible for filtering against live entries.
    pub fn keys(&self, tag: &str) -> impl Iterator<Item = &str> {
        self.tags.get(tag).into_iter().flatten().map(String::as_str)
    }

    // == Retain ==
    /// Shrinks a tag's set to the keys satisfying `live`, self-healing
    /// stale references. Drops the tag entirely if its set empties.
    pub fn retain_live(&mut self, tag: &str, live: impl Fn(&str) -> bool) {
        if let Some(keys) = self.tags.get_mut(tag) {
            keys.retain(|key| live(key));
            if keys.is_empty() {
                self.tags.remove(tag);
            }
        }
    }

    // == Prune Key ==
    /// Removes a key from every tag set it appears in, dropping tags whose
    /// sets empty out. Used on explicit deletion, where eager pruning is
    /// worth the full scan.
    pub fn prune_key(&mut self, key: &str) {
        self.tags.retain(|_, keys| {
            keys.remove(key);
            !keys.is_empty()
        });
    }

    // == Remove Tag ==
    /// Discards a tag's entire set, returning the recorded keys.
    pub fn remove_tag(&mut self, tag: &str) -> Vec<String> {
        self.tags
            .remove(tag)
            .map(|keys| keys.into_iter().collect())
            .unwrap_or_default()
    }

    // == Contains ==
    /// Checks whether a tag currently has any recorded keys.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    // == Length ==
    /// Returns the number of tags with at least one recorded key.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    // == Clear ==
    /// Drops every tag set.
    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn collect(index: &TagIndex, tag: &str) -> Vec<String> {
        let mut keys: Vec<String> = index.keys(tag).map(str::to_string).collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_tag_index_new() {
        let index = TagIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_add_and_lookup() {
        let mut index = TagIndex::new();

        index.add("user:1", &["users", "admins"]);
        index.add("user:2", &["users"]);

        assert_eq!(collect(&index, "users"), vec!["user:1", "user:2"]);
        assert_eq!(collect(&index, "admins"), vec!["user:1"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut index = TagIndex::new();

        index.add("k", &["t"]);
        index.add("k", &["t"]);

        assert_eq!(collect(&index, "t"), vec!["k"]);
    }

    #[test]
    fn test_unknown_tag_yields_nothing() {
        let index = TagIndex::new();
        assert_eq!(index.keys("missing").count(), 0);
        assert!(!index.contains_tag("missing"));
    }

    #[test]
    fn test_prune_key_removes_from_all_tags() {
        let mut index = TagIndex::new();

        index.add("k", &["a", "b"]);
        index.add("other", &["a"]);

        index.prune_key("k");

        assert_eq!(collect(&index, "a"), vec!["other"]);
        // Tag "b" only held "k" and is dropped entirely
        assert!(!index.contains_tag("b"));
    }

    #[test]
    fn test_retain_live_self_heals() {
        let mut index = TagIndex::new();

        index.add("live", &["t"]);
        index.add("dead", &["t"]);

        index.retain_live("t", |key| key == "live");

        assert_eq!(collect(&index, "t"), vec!["live"]);

        // Healing away the last key drops the tag
        index.retain_live("t", |_| false);
        assert!(!index.contains_tag("t"));
    }

    #[test]
    fn test_remove_tag_returns_members() {
        let mut index = TagIndex::new();

        index.add("a", &["t"]);
        index.add("b", &["t"]);

        let mut removed = index.remove_tag("t");
        removed.sort();

        assert_eq!(removed, vec!["a", "b"]);
        assert!(!index.contains_tag("t"));
        assert_eq!(index.remove_tag("t"), Vec::<String>::new());
    }

    #[test]
    fn test_clear() {
        let mut index = TagIndex::new();

        index.add("a", &["x", "y"]);
        index.clear();

        assert!(index.is_empty());
    }
}
