//! API Module
//!
//! HTTP handlers and routing for the storage server REST API.
//!
//! # Endpoints
//! - `PUT /put` - Store a key-value pair
//! - `PUT /put_if_absent` - Store a key-value pair if the key is new
//! - `PUT /set` - Update an existing key
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /keys` - List keys by recency
//! - `GET /stats` - Get storage statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
