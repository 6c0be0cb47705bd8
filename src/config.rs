//! Configuration Module
//!
//! Handles loading the server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::MemoryStoreOptions;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of keys in the boot store (0 = unbounded)
    pub max_keys: usize,
    /// Default TTL in milliseconds for the boot store (0 = disabled)
    pub default_ttl_ms: u64,
    /// Sweep interval in milliseconds (0 = store default)
    pub sweep_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Name the boot store is registered under
    pub default_store: String,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_KEYS` - Maximum keys in the boot store (default: 0)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 0)
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_STORE` - Name of the boot store (default: "default")
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_keys: env_or("MAX_KEYS", defaults.max_keys),
            default_ttl_ms: env_or("DEFAULT_TTL_MS", defaults.default_ttl_ms),
            sweep_interval_ms: env_or("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            default_store: env::var("DEFAULT_STORE")
                .ok()
                .filter(|name| !name.is_empty())
                .unwrap_or(defaults.default_store),
        }
    }

    /// Options for the store created at boot.
    pub fn memory_options(&self) -> MemoryStoreOptions {
        MemoryStoreOptions::new()
            .with_max_keys(self.max_keys)
            .with_default_ttl(Duration::from_millis(self.default_ttl_ms))
            .with_sweep_interval(Duration::from_millis(self.sweep_interval_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_keys: 0,
            default_ttl_ms: 0,
            sweep_interval_ms: 1000,
            server_port: 3000,
            default_store: "default".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_keys, 0);
        assert_eq!(config.default_ttl_ms, 0);
        assert_eq!(config.sweep_interval_ms, 1000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.default_store, "default");
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("MAX_KEYS");
        env::remove_var("DEFAULT_TTL_MS");
        env::remove_var("SWEEP_INTERVAL_MS");
        env::remove_var("SERVER_PORT");
        env::remove_var("DEFAULT_STORE");

        let config = Config::from_env();
        assert_eq!(config.max_keys, 0);
        assert_eq!(config.default_ttl_ms, 0);
        assert_eq!(config.sweep_interval_ms, 1000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.default_store, "default");
    }

    #[test]
    fn test_memory_options() {
        let config = Config {
            max_keys: 10,
            default_ttl_ms: 50,
            sweep_interval_ms: 0,
            ..Config::default()
        };

        let options = config.memory_options();
        assert_eq!(options.max_keys, 10);
        assert_eq!(options.default_ttl, Duration::from_millis(50));
        assert_eq!(
            options.effective_sweep_interval(),
            crate::cache::DEFAULT_SWEEP_INTERVAL
        );
    }
}
