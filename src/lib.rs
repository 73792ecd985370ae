//! LRU KV - A byte-budgeted in-memory key/value store
//!
//! Stores values under string keys, keeps the total size of keys and values
//! within a fixed capacity and evicts least recently used entries to make room.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use api::AppState;
pub use config::Config;
pub use storage::{GlobalLockLru, SimpleLru, Storage};
