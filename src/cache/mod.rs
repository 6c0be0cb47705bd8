//! Cache Module
//!
//! The backend contract every store implements, key and value constraints,
//! and the in-process TTL store.

mod backend;
mod key;
mod options;
mod stats;
pub(crate) mod store;
mod value;


// Re-export public types
pub use backend::CacheBackend;
pub use key::CacheKey;
pub(crate) use key::require_key;
pub use options::{MemoryStoreOptions, SetOptions, DEFAULT_SWEEP_INTERVAL};
pub use stats::CacheStats;
pub use store::MemoryStore;
pub use value::CacheValue;
pub(crate) use value::require_value;
