//! Monitoring configuration

use serde::{Deserialize, Serialize};

/// Telemetry aggregator and sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Time bucket duration in milliseconds
    #[serde(default = "default_window_size_ms")]
    pub window_size_ms: u64,
    /// How many buckets to retain before eviction
    #[serde(default = "default_window_count")]
    pub window_count: u64,
    /// Fraction of non-exempt requests that get full metric collection
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    /// Path prefixes that only receive lightweight monitoring
    #[serde(default = "default_exempt_prefixes")]
    pub exempt_prefixes: Vec<String>,
    /// Exact paths treated as health checks (lightweight monitoring)
    #[serde(default = "default_health_paths")]
    pub health_paths: Vec<String>,
    /// Alert thresholds evaluated on every recorded sample
    #[serde(default)]
    pub thresholds: AlertThresholds,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            window_size_ms: default_window_size_ms(),
            window_count: default_window_count(),
            sample_rate: default_sample_rate(),
            exempt_prefixes: default_exempt_prefixes(),
            health_paths: default_health_paths(),
            thresholds: AlertThresholds::default(),
        }
    }
}

/// Threshold values for the synchronous alert checks.
///
/// Runtime-configurable so deployments (and tests) can tighten or relax the
/// alerting behavior without recompiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Per-request response time alert threshold in milliseconds
    #[serde(default = "default_response_time_ms")]
    pub response_time_ms: u64,
    /// Used/total memory ratio alert threshold
    #[serde(default = "default_memory_ratio")]
    pub memory_ratio: f64,
    /// Cumulative CPU time over wall-clock uptime alert threshold
    #[serde(default = "default_cpu_ratio")]
    pub cpu_ratio: f64,
    /// Bucket error rate alert threshold
    #[serde(default = "default_error_rate")]
    pub error_rate: f64,
    /// In-flight request count alert threshold
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            response_time_ms: default_response_time_ms(),
            memory_ratio: default_memory_ratio(),
            cpu_ratio: default_cpu_ratio(),
            error_rate: default_error_rate(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

fn default_window_size_ms() -> u64 {
    60_000
}

fn default_window_count() -> u64 {
    60
}

fn default_sample_rate() -> f64 {
    0.1
}

fn default_exempt_prefixes() -> Vec<String> {
    vec![
        "/static/".to_string(),
        "/assets/".to_string(),
        "/api/monitor".to_string(),
    ]
}

fn default_health_paths() -> Vec<String> {
    vec!["/health".to_string(), "/healthcheck".to_string()]
}

fn default_response_time_ms() -> u64 {
    1_000
}

fn default_memory_ratio() -> f64 {
    0.90
}

fn default_cpu_ratio() -> f64 {
    0.85
}

fn default_error_rate() -> f64 {
    0.05
}

fn default_concurrent_requests() -> u64 {
    1_000
}
