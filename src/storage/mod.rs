//! Storage Module
//!
//! Byte-budgeted key/value storage with LRU eviction.

mod global_lock;
mod recency;
mod simple_lru;
mod stats;


// Re-export public types
pub use global_lock::GlobalLockLru;
pub use recency::{Handle, RecencyList};
pub use simple_lru::SimpleLru;
pub use stats::StorageStats;

// == Storage Trait ==
/// Thread-safe key/value storage shared by request handlers.
///
/// Every failure is reported as `false` (or `None` for [`Storage::get`]) and
/// leaves the storage unchanged.
pub trait Storage: Send + Sync {
    /// Stores the value, replacing any existing one.
    fn put(&self, key: &str, value: &[u8]) -> bool;

    /// Stores the value only if the key is absent.
    fn put_if_absent(&self, key: &str, value: &[u8]) -> bool;

    /// Replaces the value of an existing key.
    fn set(&self, key: &str, value: &[u8]) -> bool;

    /// Removes the key.
    fn delete(&self, key: &str) -> bool;

    /// Returns a copy of the value, counting as a use of the entry.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Byte budget for keys and values.
    fn capacity(&self) -> usize;

    /// Whether the entry could ever be admitted.
    fn fits(&self, key: &str, value: &[u8]) -> bool;

    /// Keys ordered from least to most recently used. Not a use of any entry.
    fn keys_by_recency(&self) -> Vec<String>;

    fn stats(&self) -> StorageStats;
}

// == Utility Functions ==
/// Bytes an entry counts against the capacity.
pub fn entry_size(key: &str, value: &[u8]) -> usize {
    key.len() + value.len()
}
