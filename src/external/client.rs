//! External key/value client capability.

use async_trait::async_trait;

/// The minimal request/response surface the adapter needs from an external
/// key/value service (Redis-like). Timeouts, retries, and connection
/// management belong to the implementation.
#[async_trait]
pub trait ExternalClient: Send + Sync {
    /// Fetches the raw string stored under `key`.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`; `args` are extra positional options such
    /// as `["PX", "30"]`.
    async fn set(&self, key: &str, value: &str, args: &[String]) -> anyhow::Result<()>;

    /// Deletes `key`, returning how many entries were removed.
    async fn delete(&self, key: &str) -> anyhow::Result<u64>;

    /// Lists keys matching a glob-style pattern.
    async fn keys(&self, pattern: &str) -> anyhow::Result<Vec<String>>;

    async fn flush_all(&self) -> anyhow::Result<()>;
}

// == Set Expiry ==
/// Native expiry option appended to a `set` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetExpiry {
    /// Expire after this many milliseconds
    Px(u64),
}

impl SetExpiry {
    /// Renders the option as positional arguments.
    pub fn to_args(self) -> Vec<String> {
        match self {
            SetExpiry::Px(millis) => vec!["PX".to_string(), millis.to_string()],
        }
    }

    /// Parses positional arguments produced by [`SetExpiry::to_args`].
    pub fn from_args(args: &[String]) -> Option<Self> {
        match args {
            [flag, millis] if flag.eq_ignore_ascii_case("PX") => {
                millis.parse().ok().map(SetExpiry::Px)
            }
            _ => None,
        }
    }
}
