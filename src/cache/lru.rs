//! LRU Store Module
//!
//! Capacity-bounded key-value storage that keeps every key in recency order
//! and evicts the least recently used key on overflow.

use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Sentinel for "no neighbour" in the intrusive list.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    prev: usize,
    next: usize,
}

// == LRU Store ==
/// Recency-ordered store bounded by a fixed capacity.
///
/// Entries live in a dense `Vec` of nodes linked into a doubly linked list:
/// - `head` = Most recently used
/// - `tail` = Least recently used
///
/// Lookups go through a `HashMap` from key to node position, so `get`, `put`
/// and `remove` are all O(1). Removal swaps the last node into the freed
/// position, so every position below `nodes.len()` holds a live node.
#[derive(Debug)]
pub struct LruStore<V> {
    /// Key -> position in `nodes`
    index: HashMap<String, usize>,
    nodes: Vec<Node<V>>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl<V> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store that holds at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            index: HashMap::new(),
            nodes: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity: capacity.get(),
        }
    }

    // == Put ==
    /// Inserts or replaces `key` and marks it as most recently used.
    ///
    /// Replacing an existing key never evicts. Inserting a new key into a
    /// full store evicts exactly one entry, the least recently used one,
    /// which is returned to the caller.
    pub fn put(&mut self, key: String, value: V) -> Option<(String, V)> {
        if let Some(&idx) = self.index.get(&key) {
            self.nodes[idx].value = value;
            self.touch(idx);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.pop_lru()
        } else {
            None
        };

        self.nodes.push(Node {
            key: key.clone(),
            value,
            prev: NIL,
            next: NIL,
        });
        let idx = self.nodes.len() - 1;
        self.index.insert(key, idx);
        self.link_front(idx);

        evicted
    }

    // == Get ==
    /// Returns the value for `key` and marks it as most recently used.
    ///
    /// A miss leaves the recency order untouched.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.touch(idx);
        Some(&self.nodes[idx].value)
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Remove ==
    /// Removes `key` if present. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.index.remove(key)?;
        Some(self.release(idx).value)
    }

    // == Purge ==
    /// Drops every entry.
    pub fn purge(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            store: self,
            cursor: self.head,
        }
    }

    /// Iterates keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == List Maintenance ==
    fn pop_lru(&mut self) -> Option<(String, V)> {
        if self.tail == NIL {
            return None;
        }
        let node = self.release(self.tail);
        self.index.remove(&node.key);
        Some((node.key, node.value))
    }

    fn touch(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    /// Unlinks and removes the node at `idx`, moving the last node into its
    /// position and repointing that node's neighbours and index entry.
    fn release(&mut self, idx: usize) -> Node<V> {
        self.unlink(idx);
        let node = self.nodes.swap_remove(idx);

        if idx < self.nodes.len() {
            let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

            if prev == NIL {
                self.head = idx;
            } else {
                self.nodes[prev].next = idx;
            }

            if next == NIL {
                self.tail = idx;
            } else {
                self.nodes[next].prev = idx;
            }

            if let Some(position) = self.index.get_mut(&self.nodes[idx].key) {
                *position = idx;
            }
        }

        node
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }

        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }

        let node = &mut self.nodes[idx];
        node.prev = NIL;
        node.next = NIL;
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = &mut self.nodes[idx];
            node.prev = NIL;
            node.next = old_head;
        }

        if old_head == NIL {
            self.tail = idx;
        } else {
            self.nodes[old_head].prev = idx;
        }
        self.head = idx;
    }
}

// == Iterator ==
/// Iterator over an [`LruStore`] in recency order, most recent first.
pub struct Iter<'a, V> {
    store: &'a LruStore<V>,
    cursor: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.store.nodes.get(self.cursor)?;
        self.cursor = node.next;
        Some((node.key.as_str(), &node.value))
    }
}
