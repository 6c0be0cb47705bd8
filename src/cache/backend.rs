//! Backend contract shared by every store.

use async_trait::async_trait;

use crate::cache::{CacheStats, SetOptions};
use crate::error::Result;

/// The capability set every store exposes.
///
/// Operations on the in-process store complete without suspending; the
/// external adapter suspends on each round trip. Error kinds, counter
/// effects, and expiry behavior are the same for both.
#[async_trait]
pub trait CacheBackend<K, V>: Send + Sync {
    /// Returns the live value for `key`, counting a hit, or `None`, counting a miss.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the key is empty.
    async fn get(&self, key: &K) -> Result<Option<V>>;

    /// Stores `value` under `key`, applying the TTL resolved from `options`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty key or null value, `MaxSizeReached` when
    /// a capped store is full and `key` is new.
    async fn set(&self, key: K, value: V, options: SetOptions) -> Result<bool>;

    /// Removes `key`, returning whether a value was actually removed.
    async fn delete(&self, key: &K) -> Result<bool>;

    /// Clears every entry and resets the counters.
    async fn flush_all(&self) -> Result<bool>;

    /// Number of stored entries.
    async fn size(&self) -> Result<usize>;

    /// All stored keys, in no particular order.
    async fn keys(&self) -> Result<Vec<K>>;

    /// Hits since the last flush.
    fn hits(&self) -> u64;

    /// Misses since the last flush.
    fn misses(&self) -> u64;

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits(),
            misses: self.misses(),
        }
    }
}
