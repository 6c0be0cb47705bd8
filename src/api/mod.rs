//! API Module
//!
//! HTTP inspection surface over a registry of JSON-valued stores.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stores` - List registered stores
//! - `DELETE /stores/:name` - Remove a store
//! - `GET /stores/:name/stats` - Store statistics
//! - `GET /stores/:name/keys` - Store keys
//! - `GET /stores/:name/get/:key` - Retrieve a value by key
//! - `PUT /stores/:name/set` - Store a key-value pair
//! - `DELETE /stores/:name/del/:key` - Delete a key
//! - `POST /stores/:name/flush` - Flush a store

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
