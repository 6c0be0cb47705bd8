//! Store and write options.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Sweep interval used when a store is configured with a zero interval.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(3_600_000);

// == Memory Store Options ==
/// Configuration for the in-process TTL store.
///
/// Zero values mean "unbounded" for `max_keys`, "no default expiry" for
/// `default_ttl`, and "use [`DEFAULT_SWEEP_INTERVAL`]" for `sweep_interval`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MemoryStoreOptions {
    /// Maximum number of distinct keys (0 = unbounded)
    #[serde(default, rename = "maxKeys", alias = "max_keys")]
    pub max_keys: usize,
    /// TTL applied to writes that don't carry their own
    #[serde(
        default,
        rename = "defaultTTL",
        alias = "default_ttl",
        deserialize_with = "millis"
    )]
    pub default_ttl: Duration,
    /// How often the background sweep runs
    #[serde(
        default,
        rename = "sweepInterval",
        alias = "sweep_interval",
        deserialize_with = "millis"
    )]
    pub sweep_interval: Duration,
}

impl MemoryStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// The interval the sweep actually runs at.
    pub fn effective_sweep_interval(&self) -> Duration {
        if self.sweep_interval.is_zero() {
            DEFAULT_SWEEP_INTERVAL
        } else {
            self.sweep_interval
        }
    }

    /// Whether this store runs a background sweep at all.
    pub fn sweep_enabled(&self) -> bool {
        !self.default_ttl.is_zero()
    }

    /// Default TTL, or `None` when disabled.
    pub fn default_ttl(&self) -> Option<Duration> {
        (!self.default_ttl.is_zero()).then_some(self.default_ttl)
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

// == Set Options ==
/// Per-write expiry options.
///
/// TTL resolution: `ignore_ttl` wins over everything and records no expiry.
/// Otherwise an explicit non-zero `ttl` is used, then the store default, then
/// no expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub ignore_ttl: bool,
    pub ttl: Option<Duration>,
}

impl SetOptions {
    /// Write with an explicit TTL relative to now.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ignore_ttl: false,
            ttl: Some(ttl),
        }
    }

    /// Write that never expires, regardless of the store default.
    pub fn ignoring_ttl() -> Self {
        Self {
            ignore_ttl: true,
            ttl: None,
        }
    }

    /// Resolves the effective TTL against a store default.
    pub fn resolve(&self, default_ttl: Option<Duration>) -> Option<Duration> {
        if self.ignore_ttl {
            return None;
        }
        self.ttl
            .filter(|ttl| !ttl.is_zero())
            .or(default_ttl.filter(|ttl| !ttl.is_zero()))
    }
}
