//! Cache Facade - pluggable key/value caching behind a named registry
//!
//! Stores share one backend contract with TTL expiration: an in-process
//! map-backed store with a background sweep, and an adapter over an external
//! Redis-like service.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod external;
pub mod models;
pub mod registry;
mod tasks;

pub use api::AppState;
pub use cache::{
    CacheBackend, CacheKey, CacheStats, CacheValue, MemoryStore, MemoryStoreOptions, SetOptions,
};
pub use config::Config;
pub use error::{CacheError, Result};
pub use external::{ExternalClient, ExternalStore, ExternalStoreOptions};
pub use registry::{CacheRegistry, SharedBackend};
