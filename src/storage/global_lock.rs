//! Global Lock Storage
//!
//! Serializes every call to a [`SimpleLru`] behind a single mutex.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::storage::{SimpleLru, Storage, StorageStats};

/// [`SimpleLru`] guarded by one mutex held for the whole of each operation.
#[derive(Debug)]
pub struct GlobalLockLru {
    inner: Mutex<SimpleLru>,
}

impl GlobalLockLru {
    /// Creates an empty store holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(SimpleLru::new(capacity)),
        }
    }

    // Operations validate before they mutate, so a panic on another thread
    // cannot leave a half-applied change behind.
    fn lock(&self) -> MutexGuard<'_, SimpleLru> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("storage lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Storage for GlobalLockLru {
    fn put(&self, key: &str, value: &[u8]) -> bool {
        self.lock().put(key, value)
    }

    fn put_if_absent(&self, key: &str, value: &[u8]) -> bool {
        self.lock().put_if_absent(key, value)
    }

    fn set(&self, key: &str, value: &[u8]) -> bool {
        self.lock().set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        self.lock().delete(key)
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key)
    }

    fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    fn fits(&self, key: &str, value: &[u8]) -> bool {
        self.lock().fits(key, value)
    }

    fn keys_by_recency(&self) -> Vec<String> {
        self.lock().keys_by_recency()
    }

    fn stats(&self) -> StorageStats {
        self.lock().stats()
    }
}
