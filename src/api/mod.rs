//! API Module
//!
//! HTTP inspection surface over a cache of JSON payloads.
//!
//! # Endpoints
//! - `PUT /cache/:key` - Cache a JSON value
//! - `GET /cache/:key` - Read a cached value
//! - `DELETE /cache/:key` - Delete a key
//! - `DELETE /cache` - Clear the cache namespace
//! - `GET /stats` - Cache statistics
//! - `POST /sweep` - Run an expiry sweep now
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
