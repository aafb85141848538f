//! Rate limiting configuration

use serde::{Deserialize, Serialize};

/// Sliding-window admission policy.
///
/// Several middleware installations may carry independent configs (for
/// example a tighter window on authentication endpoints); each instance is
/// immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum requests per identity per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
    /// Window duration in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Prefix for counter store keys; full key is `{key_prefix}:{identity}`
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Counter store driver
    #[serde(default)]
    pub driver: CounterStoreDriver,
    /// Per-operation counter store timeout in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
            key_prefix: default_key_prefix(),
            driver: CounterStoreDriver::default(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

/// Which counter store backs the sliding window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CounterStoreDriver {
    /// Process-local map; suitable for single-instance deployments
    #[default]
    Memory,
    /// Shared Redis sorted sets; admission decisions span instances
    Redis,
}

fn default_enabled() -> bool {
    true
}

fn default_max_requests() -> u64 {
    100
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_key_prefix() -> String {
    "ratelimit".to_string()
}

fn default_store_timeout_ms() -> u64 {
    1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_config_default() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.window_ms, 60_000);
        assert_eq!(config.key_prefix, "ratelimit");
        assert_eq!(config.driver, CounterStoreDriver::Memory);
    }

    #[test]
    fn test_driver_serialization() {
        assert_eq!(
            serde_json::to_string(&CounterStoreDriver::Memory).unwrap(),
            "\"memory\""
        );
        assert_eq!(
            serde_json::to_string(&CounterStoreDriver::Redis).unwrap(),
            "\"redis\""
        );
    }

    #[test]
    fn test_deserialization_defaults() {
        let config: RateLimitConfig = serde_json::from_str("{}").unwrap();
        assert!(config.enabled);
        assert_eq!(config.store_timeout_ms, 1_000);
    }

    #[test]
    fn test_deserialization_overrides() {
        let json = r#"{
            "enabled": true,
            "max_requests": 10,
            "window_ms": 1000,
            "key_prefix": "rl",
            "driver": "redis"
        }"#;
        let config: RateLimitConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.window_ms, 1000);
        assert_eq!(config.key_prefix, "rl");
        assert_eq!(config.driver, CounterStoreDriver::Redis);
    }
}
