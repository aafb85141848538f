//! Configuration management for the governance layer
//!
//! This module handles loading and validation of all governance configuration.

pub mod models;

pub use models::*;

use crate::utils::error::{GovernorError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the governance layer
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Admission policy
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Telemetry aggregation and sampling
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Shared counter store connection (used when the redis driver is selected)
    #[serde(default)]
    pub redis: RedisConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GovernorError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| GovernorError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.enabled {
            if self.rate_limit.max_requests == 0 {
                return Err(GovernorError::Config(
                    "rate_limit.max_requests must be greater than zero".to_string(),
                ));
            }
            if self.rate_limit.window_ms == 0 {
                return Err(GovernorError::Config(
                    "rate_limit.window_ms must be greater than zero".to_string(),
                ));
            }
            if self.rate_limit.key_prefix.is_empty() {
                return Err(GovernorError::Config(
                    "rate_limit.key_prefix must not be empty".to_string(),
                ));
            }
        }

        if self.monitoring.window_size_ms == 0 {
            return Err(GovernorError::Config(
                "monitoring.window_size_ms must be greater than zero".to_string(),
            ));
        }
        if self.monitoring.window_count == 0 {
            return Err(GovernorError::Config(
                "monitoring.window_count must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.monitoring.sample_rate) {
            return Err(GovernorError::Config(
                "monitoring.sample_rate must be within [0.0, 1.0]".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config::default();
        config.rate_limit.window_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_rate_bounds() {
        let mut config = Config::default();
        config.monitoring.sample_rate = 1.5;
        assert!(config.validate().is_err());
        config.monitoring.sample_rate = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disabled_rate_limit_skips_policy_checks() {
        let mut config = Config::default();
        config.rate_limit.enabled = false;
        config.rate_limit.max_requests = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = r#"
rate_limit:
  max_requests: 25
  window_ms: 5000
  driver: redis
monitoring:
  sample_rate: 0.5
redis:
  url: "redis://cache:6379"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.rate_limit.max_requests, 25);
        assert_eq!(config.rate_limit.driver, CounterStoreDriver::Redis);
        assert_eq!(config.monitoring.sample_rate, 0.5);
        assert_eq!(config.redis.url, "redis://cache:6379");
        assert!(config.validate().is_ok());
    }
}
