//! External Store Module
//!
//! Backend adapter that delegates storage and expiry to an external
//! key/value service through an injected [`ExternalClient`].

use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{require_key, require_value, CacheBackend, CacheStats, CacheValue, SetOptions};
use crate::error::Result;
use crate::external::{ExternalClient, SetExpiry};

/// Pattern used to enumerate keys for `size` and `keys`.
///
/// The adapter has no namespace of its own, so this covers every key the
/// client can see, including keys written by other stores sharing it.
pub const ALL_KEYS_PATTERN: &str = "*";

/// Options for the external adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalStoreOptions {
    /// TTL applied to writes that don't carry their own
    pub default_ttl: Option<Duration>,
}

impl ExternalStoreOptions {
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }
}

// == External Store ==
/// String-keyed store backed by an external service.
///
/// Values travel as JSON text. There is no background activity: expiry is
/// sent to the service as a `PX` option and enforced there.
#[derive(Debug)]
pub struct ExternalStore<V, C> {
    client: C,
    options: ExternalStoreOptions,
    stats: Mutex<CacheStats>,
    _value: PhantomData<fn() -> V>,
}

impl<V, C> ExternalStore<V, C>
where
    V: CacheValue + Serialize + DeserializeOwned,
    C: ExternalClient,
{
    pub fn new(client: C) -> Self {
        Self::with_options(client, ExternalStoreOptions::default())
    }

    pub fn with_options(client: C, options: ExternalStoreOptions) -> Self {
        Self {
            client,
            options,
            stats: Mutex::new(CacheStats::new()),
            _value: PhantomData,
        }
    }

    /// The underlying client, for calls outside the backend contract.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn stats_mut(&self) -> MutexGuard<'_, CacheStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decodes a wire payload, handing back the raw text when it isn't JSON.
    fn decode(raw: String) -> Result<V> {
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(_) => Ok(serde_json::from_value(Value::String(raw))?),
        }
    }

    fn expiry_args(&self, options: SetOptions) -> Vec<String> {
        options
            .resolve(self.options.default_ttl)
            .map(|ttl| {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
                SetExpiry::Px(millis).to_args()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl<V, C> CacheBackend<String, V> for ExternalStore<V, C>
where
    V: CacheValue + Serialize + DeserializeOwned + Send + Sync + 'static,
    C: ExternalClient,
{
    async fn get(&self, key: &String) -> Result<Option<V>> {
        require_key(key, "get")?;

        let raw = self.client.get(key).await?;
        let value = raw.map(Self::decode).transpose()?;
        self.stats_mut().record_lookup(value.is_some());

        Ok(value)
    }

    async fn set(&self, key: String, value: V, options: SetOptions) -> Result<bool> {
        require_key(&key, "set")?;
        require_value(&value)?;

        let payload = serde_json::to_string(&value)?;

        let args = self.expiry_args(options);
        self.client.set(&key, &payload, &args).await?;
        debug!(%key, ?args, "Value written to external store");
        Ok(true)
    }

    async fn delete(&self, key: &String) -> Result<bool> {
        require_key(key, "delete")?;
        Ok(self.client.delete(key).await? > 0)
    }

    async fn flush_all(&self) -> Result<bool> {
        self.client.flush_all().await?;
        self.stats_mut().reset();
        Ok(true)
    }

    async fn size(&self) -> Result<usize> {
        Ok(self.client.keys(ALL_KEYS_PATTERN).await?.len())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.client.keys(ALL_KEYS_PATTERN).await?)
    }

    fn hits(&self) -> u64 {
        self.stats_mut().hits
    }

    fn misses(&self) -> u64 {
        self.stats_mut().misses
    }

    fn stats(&self) -> CacheStats {
        *self.stats_mut()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde::Deserialize;
    use std::collections::HashMap;

    /// Records every call and stores raw strings without expiry.
    #[derive(Default)]
    struct RecordingClient {
        data: Mutex<HashMap<String, String>>,
        set_calls: Mutex<Vec<(String, String, Vec<String>)>>,
    }

    #[async_trait]
    impl ExternalClient for RecordingClient {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str, args: &[String]) -> anyhow::Result<()> {
            self.set_calls
                .lock()
                .unwrap()
                .push((key.to_string(), value.to_string(), args.to_vec()));
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> anyhow::Result<u64> {
            Ok(self.data.lock().unwrap().remove(key).map_or(0, |_| 1))
        }

        async fn keys(&self, _pattern: &str) -> anyhow::Result<Vec<String>> {
            Ok(self.data.lock().unwrap().keys().cloned().collect())
        }

        async fn flush_all(&self) -> anyhow::Result<()> {
            self.data.lock().unwrap().clear();
            Ok(())
        }
    }

    struct BrokenClient;

    #[async_trait]
    impl ExternalClient for BrokenClient {
        async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("connection refused")
        }

        async fn set(&self, _key: &str, _value: &str, _args: &[String]) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }

        async fn delete(&self, _key: &str) -> anyhow::Result<u64> {
            anyhow::bail!("connection refused")
        }

        async fn keys(&self, _pattern: &str) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("connection refused")
        }

        async fn flush_all(&self) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Person {
        name: String,
    }

    impl CacheValue for Person {}

    fn last_args(store: &ExternalStore<Value, RecordingClient>) -> Vec<String> {
        store
            .client()
            .set_calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, _, args)| args.clone())
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_encodes_json() {
        let store: ExternalStore<Person, RecordingClient> =
            ExternalStore::new(RecordingClient::default());

        store
            .set("a".into(), Person { name: "ali".into() }, SetOptions::default())
            .await
            .unwrap();

        let calls = store.client().set_calls.lock().unwrap();
        assert_eq!(calls[0].1, r#"{"name":"ali"}"#);
        assert!(calls[0].2.is_empty());
    }

    #[tokio::test]
    async fn test_ttl_becomes_px_option() {
        let store: ExternalStore<Value, RecordingClient> = ExternalStore::with_options(
            RecordingClient::default(),
            ExternalStoreOptions::default().with_default_ttl(Duration::from_millis(500)),
        );

        store
            .set("a".into(), Value::from(1), SetOptions::with_ttl(Duration::from_millis(10)))
            .await
            .unwrap();
        assert_eq!(last_args(&store), vec!["PX", "10"]);

        store
            .set("b".into(), Value::from(2), SetOptions::default())
            .await
            .unwrap();
        assert_eq!(last_args(&store), vec!["PX", "500"]);

        store
            .set("c".into(), Value::from(3), SetOptions::ignoring_ttl())
            .await
            .unwrap();
        assert!(last_args(&store).is_empty());
    }

    #[tokio::test]
    async fn test_sub_millisecond_ttl_rounds_up() {
        let store: ExternalStore<Value, RecordingClient> =
            ExternalStore::new(RecordingClient::default());

        store
            .set("a".into(), Value::from(1), SetOptions::with_ttl(Duration::from_micros(200)))
            .await
            .unwrap();
        assert_eq!(last_args(&store), vec!["PX", "1"]);
    }

    #[tokio::test]
    async fn test_null_value_rejected() {
        let store: ExternalStore<Value, RecordingClient> =
            ExternalStore::new(RecordingClient::default());

        let result = store.set("a".into(), Value::Null, SetOptions::default()).await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        assert!(store.client().set_calls.lock().unwrap().is_empty());

        let store: ExternalStore<Option<u32>, RecordingClient> =
            ExternalStore::new(RecordingClient::default());
        let result = store.set("a".into(), None, SetOptions::default()).await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let store: ExternalStore<Value, RecordingClient> =
            ExternalStore::new(RecordingClient::default());

        let err = store.get(&String::new()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: cannot get value without a key"
        );
        assert!(matches!(
            store.set(String::new(), Value::from(1), SetOptions::default()).await,
            Err(CacheError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.delete(&String::new()).await,
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_non_json_payload_returned_raw() {
        let store: ExternalStore<Value, RecordingClient> =
            ExternalStore::new(RecordingClient::default());
        store
            .client()
            .set("nonJson", "This is not JSON", &[])
            .await
            .unwrap();

        let result = store.get(&"nonJson".to_string()).await.unwrap();
        assert_eq!(result, Some(Value::String("This is not JSON".into())));
        assert_eq!(store.hits(), 1);

        let typed: ExternalStore<String, RecordingClient> =
            ExternalStore::new(RecordingClient::default());
        typed.client().set("raw", "plain text", &[]).await.unwrap();
        assert_eq!(
            typed.get(&"raw".to_string()).await.unwrap().as_deref(),
            Some("plain text")
        );
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_serialization_error() {
        let store: ExternalStore<Person, RecordingClient> =
            ExternalStore::new(RecordingClient::default());
        store.client().set("p", "not a person", &[]).await.unwrap();

        let result = store.get(&"p".to_string()).await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
        // The failed decode is neither a hit nor a miss
        assert_eq!(store.stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_stats_and_flush() {
        let store: ExternalStore<Value, RecordingClient> =
            ExternalStore::new(RecordingClient::default());

        store
            .set("a".into(), Value::from(1), SetOptions::default())
            .await
            .unwrap();
        assert_eq!(store.get(&"a".into()).await.unwrap(), Some(Value::from(1)));
        assert_eq!(store.get(&"b".into()).await.unwrap(), None);
        assert_eq!(store.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(store.size().await.unwrap(), 1);

        assert!(store.delete(&"a".into()).await.unwrap());
        assert!(!store.delete(&"a".into()).await.unwrap());

        store
            .set("c".into(), Value::from(3), SetOptions::default())
            .await
            .unwrap();
        assert!(store.flush_all().await.unwrap());
        assert_eq!(store.size().await.unwrap(), 0);
        assert_eq!(store.hits(), 0);
        assert_eq!(store.misses(), 0);
    }

    #[tokio::test]
    async fn test_client_errors_propagate() {
        let store: ExternalStore<Value, BrokenClient> = ExternalStore::new(BrokenClient);

        assert!(matches!(
            store.get(&"a".into()).await,
            Err(CacheError::Backend(_))
        ));
        assert!(matches!(
            store.set("a".into(), Value::from(1), SetOptions::default()).await,
            Err(CacheError::Backend(_))
        ));
        assert!(matches!(store.size().await, Err(CacheError::Backend(_))));
        assert!(matches!(store.flush_all().await, Err(CacheError::Backend(_))));
        // A failed round trip is neither a hit nor a miss
        assert_eq!(store.stats(), CacheStats::default());
    }
}
