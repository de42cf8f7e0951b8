//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.
//!
//! Recency order is kept in a doubly linked list stored as a dense node
//! arena: `prev`/`next` are integer indices (`NIL` sentinel for "none")
//! rather than pointers, and freed slots are recycled through a free list.
//! Head = most recently used, tail = least recently used. Touch, remove
//! and eviction are all O(1).

use std::collections::HashMap;

/// Sentinel index meaning "no node".
const NIL: usize = usize::MAX;

// == LRU Node ==
#[derive(Debug)]
struct LruNode {
    key: String,
    prev: usize,
    next: usize,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Node arena; slots listed in `free` hold stale data
    nodes: Vec<LruNode>,
    /// Canonical key -> arena index
    index: HashMap<String, usize>,
    /// Recycled arena slots
    free: Vec<usize>,
    /// Most recently used node, NIL when empty
    head: usize,
    /// Least recently used node, NIL when empty
    tail: usize,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    // == Touch ==
    /// Marks a key as recently used (moves it to the head).
    ///
    /// If the key is not tracked yet, a node is inserted at the head.
    pub fn touch(&mut self, key: &str) {
        if let Some(&idx) = self.index.get(key) {
            self.unlink(idx);
            self.link_front(idx);
        } else {
            let idx = self.allocate(key);
            self.link_front(idx);
            self.index.insert(key.to_string(), idx);
        }
    }

    // == Remove ==
    /// Removes a key from the tracker. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(idx) = self.index.remove(key) {
            self.unlink(idx);
            self.free.push(idx);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let idx = self.tail;
        if idx == NIL {
            return None;
        }

        self.unlink(idx);
        self.free.push(idx);

        let key = std::mem::take(&mut self.nodes[idx].key);
        self.index.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        if self.tail == NIL {
            None
        } else {
            Some(&self.nodes[self.tail].key)
        }
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Clear ==
    /// Drops all tracked keys and recycled slots.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    // == Internal Helpers ==
    /// Takes a slot from the free list or grows the arena.
    fn allocate(&mut self, key: &str) -> usize {
        if let Some(idx) = self.free.pop() {
            let node = &mut self.nodes[idx];
            node.key = key.to_string();
            node.prev = NIL;
            node.next = NIL;
            idx
        } else {
            self.nodes.push(LruNode {
                key: key.to_string(),
                prev: NIL,
                next: NIL,
            });
            self.nodes.len() - 1
        }
    }

    /// Detaches a node from the list, fixing up its neighbors.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

        if prev != NIL {
            self.nodes[prev].next = next;
        } else if self.head == idx {
            self.head = next;
        }

        if next != NIL {
            self.nodes[next].prev = prev;
        } else if self.tail == idx {
            self.tail = prev;
        }

        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    /// Attaches a detached node at the head (most recent position).
    fn link_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;

        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;

        if self.tail == NIL {
            self.tail = idx;
        }
    }
}
