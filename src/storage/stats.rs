//! Storage Statistics Module
//!
//! Tracks lookup hits and misses, evictions and byte usage.

use serde::Serialize;

// == Storage Stats ==
/// Storage performance and occupancy metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of lookups for absent keys
    pub misses: u64,
    /// Number of entries removed to make room for others
    pub evictions: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Bytes currently used by keys and values
    pub current_size: usize,
    /// Configured byte budget
    pub capacity: usize,
}

impl StorageStats {
    // == Constructor ==
    /// Creates a new StorageStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Occupancy ==
    /// Updates entry count and byte usage.
    pub fn set_occupancy(&mut self, total_entries: usize, current_size: usize, capacity: usize) {
        self.total_entries = total_entries;
        self.current_size = current_size;
        self.capacity = capacity;
    }
}
