//! Cache key constraints.

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::error::{CacheError, Result};

/// A type usable as a cache key.
///
/// Keys must hash and compare for equality. Each key type decides what an
/// "empty" key is; operations reject empty keys with `InvalidArgument`.
pub trait CacheKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {
    /// Returns true if this key cannot address an entry.
    fn is_empty_key(&self) -> bool {
        false
    }
}

impl CacheKey for String {
    fn is_empty_key(&self) -> bool {
        self.is_empty()
    }
}

impl CacheKey for &'static str {
    fn is_empty_key(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! always_valid_key {
    ($($ty:ty),* $(,)?) => {
        $(impl CacheKey for $ty {})*
    };
}

always_valid_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool);

impl CacheKey for DateTime<Utc> {}

/// Rejects empty keys with `cannot <action> value without a key`.
pub(crate) fn require_key<K: CacheKey>(key: &K, action: &str) -> Result<()> {
    if key.is_empty_key() {
        return Err(CacheError::InvalidArgument(format!(
            "cannot {} value without a key",
            action
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_keys() {
        assert!(String::new().is_empty_key());
        assert!(!"k".to_string().is_empty_key());
        assert!("".is_empty_key());
    }

    #[test]
    fn test_scalar_keys_always_valid() {
        assert!(!0u64.is_empty_key());
        assert!(!Utc::now().is_empty_key());
    }

    #[test]
    fn test_require_key_message() {
        let err = require_key(&String::new(), "get").unwrap_err();
        assert!(matches!(err, CacheError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "Invalid argument: cannot get value without a key"
        );
        assert!(require_key(&7u32, "delete").is_ok());
    }
}
