//! Memory Store Module
//!
//! In-process cache engine: a HashMap of values, a parallel HashMap of
//! absolute expiry instants, hit/miss counters, and a background sweep.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{
    require_key, require_value, CacheBackend, CacheKey, CacheStats, CacheValue,
    MemoryStoreOptions, SetOptions,
};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

// == Store State ==
/// Everything the store and its sweep task mutate, guarded by one mutex.
#[derive(Debug)]
pub(crate) struct StoreState<K, V> {
    /// Key-value storage
    data: HashMap<K, V>,
    /// Absolute expiry per key; only keys with an effective TTL appear here
    expirations: HashMap<K, Instant>,
    stats: CacheStats,
}

impl<K: CacheKey, V> StoreState<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            data: HashMap::new(),
            expirations: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    fn is_expired(&self, key: &K, now: Instant) -> bool {
        self.expirations
            .get(key)
            .is_some_and(|expires_at| *expires_at <= now)
    }

    /// The single delete path used by explicit deletes, lazy expiry, and sweeps.
    fn remove(&mut self, key: &K) -> bool {
        self.expirations.remove(key);
        self.data.remove(key).is_some()
    }

    // == Sweep Expired ==
    /// Removes every key whose expiry is at or before `now`.
    ///
    /// Returns the number of keys removed.
    pub(crate) fn sweep_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<K> = self
            .expirations
            .iter()
            .filter(|(_, expires_at)| **expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }

        expired.len()
    }

    fn clear(&mut self) {
        self.data.clear();
        self.expirations.clear();
        self.stats.reset();
    }
}

// == Memory Store ==
/// In-process key/value store with TTL expiration.
///
/// Expired keys are removed lazily on `get` and eagerly by a background sweep
/// that runs every `sweep_interval` when the store has a default TTL. The
/// sweep is owned by the store: it restarts on `flush_all` and stops on drop.
///
/// # Example
/// ```ignore
/// let store: MemoryStore<String, String> = MemoryStore::new(
///     MemoryStoreOptions::new().with_default_ttl(Duration::from_secs(60)),
/// );
/// store.set("k".to_string(), "v".to_string(), SetOptions::default())?;
/// assert_eq!(store.get(&"k".to_string())?, Some("v".to_string()));
/// ```
#[derive(Debug)]
pub struct MemoryStore<K, V> {
    state: Arc<Mutex<StoreState<K, V>>>,
    options: MemoryStoreOptions,
    /// Handle of the running sweep task, if any
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> MemoryStore<K, V>
where
    K: CacheKey,
    V: CacheValue + Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates an empty store and starts its sweep when a default TTL is set.
    ///
    /// Outside a Tokio runtime the sweep cannot be spawned; expired keys are
    /// then only removed on access or by [`MemoryStore::sweep_expired`].
    pub fn new(options: MemoryStoreOptions) -> Self {
        let store = Self {
            state: Arc::new(Mutex::new(StoreState::new())),
            options,
            sweeper: Mutex::new(None),
        };
        store.start_sweep();
        store
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_sweep(&self) {
        if !self.options.sweep_enabled() {
            return;
        }

        let mut sweeper = self.sweeper.lock().unwrap_or_else(PoisonError::into_inner);
        if sweeper.is_some() {
            return;
        }

        match Handle::try_current() {
            Ok(handle) => {
                *sweeper = Some(spawn_sweep_task(
                    &handle,
                    Arc::downgrade(&self.state),
                    self.options.effective_sweep_interval(),
                ));
            }
            Err(_) => {
                warn!("No Tokio runtime available, expired keys will only be removed on access");
            }
        }
    }

    fn stop_sweep(&self) {
        let mut sweeper = self.sweeper.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = sweeper.take() {
            handle.abort();
        }
    }

    /// Returns true while a background sweep task is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An expired key is deleted before the read and counted as a miss.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        require_key(key, "get")?;

        let mut state = self.lock();
        if state.is_expired(key, Instant::now()) {
            state.remove(key);
            debug!(?key, "Expired key removed on read");
        }

        let value = state.data.get(key).cloned();
        state.stats.record_lookup(value.is_some());
        Ok(value)
    }

    // == Set ==
    /// Stores a value, overwriting any previous one.
    ///
    /// Overwriting an existing key never trips the key cap, and expired
    /// entries are swept before a new key is refused. If the resolved TTL
    /// cannot be turned into an expiry instant, the write is undone.
    pub fn set(&self, key: K, value: V, options: SetOptions) -> Result<bool> {
        require_key(&key, "set")?;
        require_value(&value)?;

        let mut state = self.lock();
        let max_keys = self.options.max_keys;
        if max_keys > 0 && !state.data.contains_key(&key) && state.data.len() >= max_keys {
            let removed = state.sweep_expired(Instant::now());
            if removed > 0 {
                debug!(removed, "Expired keys swept to make room");
            }
            if state.data.len() >= max_keys {
                return Err(CacheError::MaxSizeReached(max_keys));
            }
        }

        let ttl = options.resolve(self.options.default_ttl());
        let previous = state.data.insert(key.clone(), value);

        match ttl {
            None => {
                state.expirations.remove(&key);
            }
            Some(ttl) => match Instant::now().checked_add(ttl) {
                Some(expires_at) => {
                    state.expirations.insert(key, expires_at);
                }
                None => {
                    // revert stored value if recording the expiry fails
                    match previous {
                        Some(previous) => {
                            state.data.insert(key, previous);
                        }
                        None => {
                            state.data.remove(&key);
                        }
                    }
                    return Err(CacheError::InvalidArgument(format!(
                        "ttl of {:?} cannot be recorded",
                        ttl
                    )));
                }
            },
        }

        Ok(true)
    }

    // == Delete ==
    /// Removes a key, returning whether a value was present.
    pub fn delete(&self, key: &K) -> Result<bool> {
        require_key(key, "delete")?;
        Ok(self.lock().remove(key))
    }

    // == Flush ==
    /// Clears all entries, resets stats, and restarts the sweep.
    pub fn flush_all(&self) -> bool {
        self.stop_sweep();
        self.lock().clear();
        self.start_sweep();
        true
    }

    /// Runs one sweep pass now. Returns the number of keys removed.
    pub fn sweep_expired(&self) -> usize {
        self.lock().sweep_expired(Instant::now())
    }

    /// Time left before `key` expires, or `None` if it has no expiry.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        let now = Instant::now();
        self.lock()
            .expirations
            .get(key)
            .map(|expires_at| expires_at.saturating_duration_since(now))
    }

    pub fn size(&self) -> usize {
        self.lock().data.len()
    }

    pub fn keys(&self) -> Vec<K> {
        self.lock().data.keys().cloned().collect()
    }

    pub fn hits(&self) -> u64 {
        self.lock().stats.hits
    }

    pub fn misses(&self) -> u64 {
        self.lock().stats.misses
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}

impl<K, V> Drop for MemoryStore<K, V> {
    fn drop(&mut self) {
        let sweeper = self.sweeper.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = sweeper.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl<K, V> CacheBackend<K, V> for MemoryStore<K, V>
where
    K: CacheKey,
    V: CacheValue + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        MemoryStore::get(self, key)
    }

    async fn set(&self, key: K, value: V, options: SetOptions) -> Result<bool> {
        MemoryStore::set(self, key, value, options)
    }

    async fn delete(&self, key: &K) -> Result<bool> {
        MemoryStore::delete(self, key)
    }

    async fn flush_all(&self) -> Result<bool> {
        let flushed = MemoryStore::flush_all(self);
        info!("Memory store flushed");
        Ok(flushed)
    }

    async fn size(&self) -> Result<usize> {
        Ok(MemoryStore::size(self))
    }

    async fn keys(&self) -> Result<Vec<K>> {
        Ok(MemoryStore::keys(self))
    }

    fn hits(&self) -> u64 {
        MemoryStore::hits(self)
    }

    fn misses(&self) -> u64 {
        MemoryStore::misses(self)
    }

    fn stats(&self) -> CacheStats {
        MemoryStore::stats(self)
    }
}
