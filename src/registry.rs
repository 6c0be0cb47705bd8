//! Registry Module
//!
//! Name → backend directory. Mediates store lifecycle only; reads and
//! writes go straight to the store handed out by [`CacheRegistry::get_store`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::cache::CacheBackend;
use crate::error::{CacheError, Result};

/// Shared handle to a registered store.
pub type SharedBackend<K, V> = Arc<dyn CacheBackend<K, V>>;

// == Cache Registry ==
/// Directory of named stores with unique names.
///
/// Callers construct and own it; there is no global instance.
pub struct CacheRegistry<K, V> {
    stores: RwLock<HashMap<String, SharedBackend<K, V>>>,
}

impl<K, V> Default for CacheRegistry<K, V> {
    fn default() -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> std::fmt::Debug for CacheRegistry<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("stores", &self.names())
            .finish()
    }
}

/// A name is valid when it is non-empty and has no whitespace or control characters.
pub fn is_valid_store_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
}

fn require_name(name: &str, purpose: &str) -> Result<()> {
    if is_valid_store_name(name) {
        Ok(())
    } else {
        Err(CacheError::InvalidArgument(format!(
            "a valid name is required to {} a cache store, got {:?}",
            purpose, name
        )))
    }
}

impl<K, V> CacheRegistry<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, SharedBackend<K, V>>> {
        self.stores.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SharedBackend<K, V>>> {
        self.stores.write().unwrap_or_else(PoisonError::into_inner)
    }

    // == Add ==
    /// Registers `store` under `name`.
    ///
    /// An existing registration is never replaced: a collision fails with
    /// `DuplicateKey` and leaves the registry unchanged.
    pub fn add_store(&self, name: &str, store: SharedBackend<K, V>) -> Result<()> {
        require_name(name, "add")?;

        let mut stores = self.write();
        if stores.contains_key(name) {
            return Err(CacheError::DuplicateKey(format!(
                "key: {} already exists!",
                name
            )));
        }

        stores.insert(name.to_string(), store);
        info!(store = name, "Cache store registered");
        Ok(())
    }

    // == Get ==
    /// Looks up the store registered under `name`.
    pub fn get_store(&self, name: &str) -> Result<SharedBackend<K, V>> {
        require_name(name, "get")?;

        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(format!("Cache store '{}' does not exist", name)))
    }

    // == Remove ==
    /// Unregisters `name`, flushing the store first when `should_flush` is set.
    ///
    /// Removing a name that isn't registered succeeds.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a malformed name, or whatever the store's
    /// `flush_all` fails with; the store stays registered in that case.
    pub async fn remove_store(&self, name: &str, should_flush: bool) -> Result<bool> {
        require_name(name, "remove")?;

        let registered = self.read().get(name).cloned();
        let Some(store) = registered else {
            return Ok(true);
        };

        if should_flush {
            store.flush_all().await?;
        }

        // Only drop the registration we flushed; a re-added store stays.
        let mut stores = self.write();
        if stores
            .get(name)
            .is_some_and(|current| Arc::ptr_eq(current, &store))
        {
            stores.remove(name);
            info!(store = name, flushed = should_flush, "Cache store removed");
        }
        Ok(true)
    }

    /// Names of all registered stores, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
