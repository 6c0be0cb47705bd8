//! External Module
//!
//! Adapter over an external key/value service.

mod client;
mod store;

pub use client::{ExternalClient, SetExpiry};
pub use store::{ExternalStore, ExternalStoreOptions, ALL_KEYS_PATTERN};
