//! Cache value constraints.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{CacheError, Result};

/// A type storable as a cache value.
///
/// Each value type decides what a "null" value is; every store rejects
/// null values on `set` with `InvalidArgument`. Plain data types are never
/// null, so implementing the trait for your own type is usually one line:
///
/// ```ignore
/// impl CacheValue for Session {}
/// ```
pub trait CacheValue {
    /// Returns true if this value stands for "no value".
    fn is_null(&self) -> bool {
        false
    }
}

impl CacheValue for Value {
    fn is_null(&self) -> bool {
        Value::is_null(self)
    }
}

impl<T> CacheValue for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

macro_rules! never_null_value {
    ($($ty:ty),* $(,)?) => {
        $(impl CacheValue for $ty {})*
    };
}

never_null_value!(
    String, &'static str, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32,
    f64, char, bool,
);

impl CacheValue for DateTime<Utc> {}

impl<T> CacheValue for Vec<T> {}

impl<K, T> CacheValue for HashMap<K, T> {}

impl<K, T> CacheValue for BTreeMap<K, T> {}

/// Rejects null values with `cannot set undefined or null`.
pub(crate) fn require_value<V: CacheValue>(value: &V) -> Result<()> {
    if value.is_null() {
        return Err(CacheError::InvalidArgument(
            "cannot set undefined or null".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_null() {
        assert!(Value::Null.is_null());
        assert!(!json!({"name": "a"}).is_null());
        assert!(!json!(0).is_null());
        assert!(!json!("").is_null());
    }

    #[test]
    fn test_option_none_is_null() {
        assert!(None::<u32>.is_null());
        assert!(!Some(0u32).is_null());
    }

    #[test]
    fn test_plain_values_never_null() {
        assert!(!String::new().is_null());
        assert!(!Vec::<u8>::new().is_null());
        assert!(!Utc::now().is_null());
    }

    #[test]
    fn test_require_value_message() {
        let err = require_value(&Value::Null).unwrap_err();
        assert!(matches!(err, CacheError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "Invalid argument: cannot set undefined or null"
        );
        assert!(require_value(&json!([])).is_ok());
    }
}
