//! API Handlers
//!
//! HTTP request handlers that translate requests into storage calls and
//! storage `false` results into error responses.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{Result, StorageError};
use crate::models::{
    DeleteResponse, EntryRequest, GetResponse, HealthResponse, KeysResponse, StatsResponse,
    WriteResponse,
};
use crate::storage::{entry_size, GlobalLockLru, Storage};

/// Application state shared across all handlers.
///
/// Holds the storage behind the [`Storage`] trait so the locking strategy can
/// be swapped without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    /// Creates a new AppState around the given storage.
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Creates a new AppState with a mutex-guarded LRU sized from the Config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(GlobalLockLru::new(config.capacity))
    }

    /// Fails with `TooLarge` if the entry could never be admitted.
    fn check_fits(&self, req: &EntryRequest) -> Result<()> {
        if self.storage.fits(&req.key, req.value.as_bytes()) {
            return Ok(());
        }
        Err(self.too_large(req))
    }

    fn too_large(&self, req: &EntryRequest) -> StorageError {
        StorageError::TooLarge {
            size: entry_size(&req.key, req.value.as_bytes()),
            capacity: self.storage.capacity(),
        }
    }
}

fn validated(req: &EntryRequest) -> Result<()> {
    match req.validate() {
        Some(error_msg) => Err(StorageError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /put
///
/// Stores the value, replacing any existing one.
pub async fn put_handler(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<WriteResponse>> {
    validated(&req)?;

    if !state.storage.put(&req.key, req.value.as_bytes()) {
        return Err(state.too_large(&req));
    }

    Ok(Json(WriteResponse::new(req.key, "stored")))
}

/// Handler for PUT /put_if_absent
///
/// Stores the value only if the key is not present yet.
pub async fn put_if_absent_handler(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<WriteResponse>> {
    validated(&req)?;
    state.check_fits(&req)?;

    if !state.storage.put_if_absent(&req.key, req.value.as_bytes()) {
        return Err(StorageError::AlreadyExists(req.key));
    }

    Ok(Json(WriteResponse::new(req.key, "inserted")))
}

/// Handler for PUT /set
///
/// Replaces the value of an existing key.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<WriteResponse>> {
    validated(&req)?;
    state.check_fits(&req)?;

    if !state.storage.set(&req.key, req.value.as_bytes()) {
        return Err(StorageError::NotFound(req.key));
    }

    Ok(Json(WriteResponse::new(req.key, "updated")))
}

/// Handler for GET /get/:key
///
/// Retrieves a value; a hit marks the entry as most recently used.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.storage.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, &value))),
        None => Err(StorageError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.storage.delete(&key) {
        return Err(StorageError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /keys
///
/// Snapshot of the keys from least to most recently used. Does not touch
/// any entry.
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse::new(state.storage.keys_by_recency()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.storage.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
