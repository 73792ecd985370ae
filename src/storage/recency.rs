//! Recency List Module
//!
//! Arena-backed doubly linked list that keeps live entries ordered from
//! least recently used (head) to most recently used (tail).

use std::mem;

// == Handle ==
/// Stable reference to an entry's slot in the arena.
///
/// A handle stays valid until the entry it refers to is removed. Freed slots
/// are recycled, so a handle must not be used after its entry is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug)]
struct Node {
    key: String,
    value: Vec<u8>,
    prev: Option<Handle>,
    next: Option<Handle>,
}

// == Recency List ==
/// Ordered sequence of entries, LRU end first.
///
/// - Head = Least recently used
/// - Tail = Most recently used
#[derive(Debug, Default)]
pub struct RecencyList {
    /// Entry storage, `None` marks a free slot
    slots: Vec<Option<Node>>,
    /// Indices of free slots available for reuse
    free: Vec<usize>,
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert At MRU ==
    /// Adds a new entry at the most recently used end and returns its handle.
    pub fn insert_at_mru(&mut self, key: String, value: Vec<u8>) -> Handle {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };

        let handle = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                Handle(slot)
            }
            None => {
                self.slots.push(Some(node));
                Handle(self.slots.len() - 1)
            }
        };

        self.link_at_mru(handle);
        self.len += 1;
        handle
    }

    // == Touch ==
    /// Moves the entry to the most recently used end.
    pub fn touch(&mut self, handle: Handle) {
        if self.tail == Some(handle) {
            return;
        }
        self.unlink(handle);
        self.link_at_mru(handle);
    }

    // == Remove ==
    /// Unlinks the entry, frees its slot and returns its key and value.
    pub fn remove(&mut self, handle: Handle) -> (String, Vec<u8>) {
        self.unlink(handle);
        let node = self.slots[handle.0]
            .take()
            .expect("recency handle refers to a freed slot");
        self.free.push(handle.0);
        self.len -= 1;
        (node.key, node.value)
    }

    // == Evict LRU ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn evict_lru(&mut self) -> Option<(String, Vec<u8>)> {
        let handle = self.head?;
        Some(self.remove(handle))
    }

    /// Handle of the least recently used entry.
    pub fn lru(&self) -> Option<Handle> {
        self.head
    }

    /// Handle of the most recently used entry.
    #[cfg(test)]
    pub fn mru(&self) -> Option<Handle> {
        self.tail
    }

    /// Neighbour of `handle` one step closer to the MRU end.
    pub fn next_toward_mru(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).next
    }

    pub fn key(&self, handle: Handle) -> &str {
        &self.node(handle).key
    }

    pub fn value(&self, handle: Handle) -> &[u8] {
        &self.node(handle).value
    }

    // == Replace Value ==
    /// Swaps in a new value without changing the entry's position.
    ///
    /// Returns the previous value.
    pub fn replace_value(&mut self, handle: Handle, value: Vec<u8>) -> Vec<u8> {
        mem::replace(&mut self.node_mut(handle).value, value)
    }

    // == Iteration ==
    /// Iterates entries from the LRU end to the MRU end.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
        std::iter::successors(self.head, move |handle| self.node(*handle).next).map(
            move |handle| {
                let node = self.node(handle);
                (node.key.as_str(), node.value.as_slice())
            },
        )
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, handle: Handle) -> &Node {
        self.slots[handle.0]
            .as_ref()
            .expect("recency handle refers to a freed slot")
    }

    fn node_mut(&mut self, handle: Handle) -> &mut Node {
        self.slots[handle.0]
            .as_mut()
            .expect("recency handle refers to a freed slot")
    }

    /// Detaches the node from its neighbours, leaving its own links cleared.
    fn unlink(&mut self, handle: Handle) {
        let (prev, next) = {
            let node = self.node(handle);
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }

        let node = self.node_mut(handle);
        node.prev = None;
        node.next = None;
    }

    fn link_at_mru(&mut self, handle: Handle) {
        let old_tail = self.tail;
        {
            let node = self.node_mut(handle);
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail) => self.node_mut(tail).next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
    }
}
