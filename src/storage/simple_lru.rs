//! Simple LRU Module
//!
//! Byte-budgeted key/value engine combining a key index with the recency
//! list. Not thread safe: wrap it (see [`GlobalLockLru`](super::GlobalLockLru))
//! before sharing it between threads.

use std::collections::HashMap;

use tracing::debug;

use crate::storage::recency::{Handle, RecencyList};
use crate::storage::{entry_size, StorageStats};

// == Simple LRU ==
/// LRU store whose total key and value bytes never exceed `capacity`.
#[derive(Debug)]
pub struct SimpleLru {
    /// Maximum sum of key and value lengths, in bytes
    capacity: usize,
    /// Sum of key and value lengths of all live entries
    current_size: usize,
    /// Key to position in the recency list
    index: HashMap<String, Handle>,
    /// Entries ordered from least to most recently used
    recency: RecencyList,
    stats: StorageStats,
}

impl SimpleLru {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            current_size: 0,
            index: HashMap::new(),
            recency: RecencyList::new(),
            stats: StorageStats::new(),
        }
    }

    // == Put ==
    /// Stores the value, replacing any existing one.
    ///
    /// Returns false, without touching anything, if the entry alone would not
    /// fit into an empty store.
    pub fn put(&mut self, key: &str, value: &[u8]) -> bool {
        match self.index.get(key).copied() {
            Some(handle) => self.update(handle, value),
            None => self.insert(key, value),
        }
    }

    // == Put If Absent ==
    /// Stores the value only if the key is not present yet.
    pub fn put_if_absent(&mut self, key: &str, value: &[u8]) -> bool {
        if self.index.contains_key(key) {
            return false;
        }
        self.insert(key, value)
    }

    // == Set ==
    /// Replaces the value of an existing key.
    ///
    /// Returns false if the key is absent or the new entry would not fit.
    pub fn set(&mut self, key: &str, value: &[u8]) -> bool {
        match self.index.get(key).copied() {
            Some(handle) => self.update(handle, value),
            None => false,
        }
    }

    // == Delete ==
    /// Removes the entry. Returns false if the key is absent.
    pub fn delete(&mut self, key: &str) -> bool {
        let Some(handle) = self.index.remove(key) else {
            return false;
        };
        let (key, value) = self.recency.remove(handle);
        self.current_size -= entry_size(&key, &value);
        true
    }

    // == Get ==
    /// Returns a copy of the value and marks the entry as most recently used.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.index.get(key).copied() {
            Some(handle) => {
                self.stats.record_hit();
                self.recency.touch(handle);
                Some(self.recency.value(handle).to_vec())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current_size(&self) -> usize {
        self.current_size
    }

    // == Fits ==
    /// Returns true if the entry could be admitted, at the cost of evicting
    /// everything else if needed.
    pub fn fits(&self, key: &str, value: &[u8]) -> bool {
        entry_size(key, value) <= self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Stats ==
    /// Returns current statistics.
    pub fn stats(&self) -> StorageStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.index.len(), self.current_size, self.capacity);
        stats
    }

    // == Keys By Recency ==
    /// Returns keys ordered from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.recency.iter().map(|(key, _)| key.to_string()).collect()
    }

    fn insert(&mut self, key: &str, value: &[u8]) -> bool {
        if !self.fits(key, value) {
            return false;
        }
        let incoming = entry_size(key, value);

        self.make_room(incoming, None);

        let handle = self.recency.insert_at_mru(key.to_string(), value.to_vec());
        self.index.insert(key.to_string(), handle);
        self.current_size += incoming;
        true
    }

    fn update(&mut self, handle: Handle, value: &[u8]) -> bool {
        let key_len = self.recency.key(handle).len();
        if key_len + value.len() > self.capacity {
            return false;
        }

        let old_len = self.recency.value(handle).len();
        if value.len() > old_len {
            self.make_room(value.len() - old_len, Some(handle));
        }

        self.recency.replace_value(handle, value.to_vec());
        self.current_size = self.current_size - old_len + value.len();
        self.recency.touch(handle);
        true
    }

    // == Make Room ==
    /// Evicts from the LRU end until `incoming` more bytes fit.
    ///
    /// `exclude` is never evicted. Callers must have checked that the entry
    /// fits on its own, which guarantees the loop stops before running out of
    /// candidates.
    fn make_room(&mut self, incoming: usize, exclude: Option<Handle>) {
        while self.current_size + incoming > self.capacity {
            let lru = self.recency.lru();
            let evicted = if lru.is_some() && lru == exclude {
                lru.and_then(|handle| self.recency.next_toward_mru(handle))
                    .map(|victim| self.recency.remove(victim))
            } else {
                self.recency.evict_lru()
            };
            let Some((key, value)) = evicted else {
                break;
            };

            self.index.remove(&key);
            let freed = entry_size(&key, &value);
            self.current_size -= freed;
            self.stats.record_eviction();
            debug!(key = %key, freed, current_size = self.current_size, "evicted entry");
        }
    }

    /// Panics unless size accounting, the index and the recency list agree.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut total = 0;
        let mut seen = std::collections::HashSet::new();
        for (key, value) in self.recency.iter() {
            total += entry_size(key, value);
            assert!(seen.insert(key.to_string()), "duplicate key {key:?}");
            let handle = self.index.get(key).copied();
            assert!(handle.is_some(), "key {key:?} missing from index");
            if let Some(handle) = handle {
                assert_eq!(self.recency.key(handle), key);
            }
        }
        assert_eq!(seen.len(), self.index.len(), "index and list disagree");
        assert_eq!(self.recency.len(), self.index.len());
        assert_eq!(total, self.current_size, "size accounting drifted");
        assert!(self.current_size <= self.capacity, "capacity exceeded");
    }
}
