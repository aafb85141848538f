//! Server types for the monitoring read surface

use crate::monitoring::metrics::AggregateStats;
use serde::Serialize;

/// Uniform response envelope used by the governance endpoints and the 429
/// rejection body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request succeeded
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Payload, `null` on failure
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Failed response with a `null` payload
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Static host information attached to the monitoring report
#[derive(Debug, Clone, Serialize)]
pub struct HostInfo {
    /// Operating system
    pub platform: &'static str,
    /// CPU architecture
    pub arch: &'static str,
    /// Logical CPU count
    pub cpu_count: usize,
    /// Total system memory, bytes
    pub total_memory_bytes: u64,
    /// Free system memory, bytes
    pub free_memory_bytes: u64,
    /// Process uptime in seconds
    pub uptime_secs: u64,
}

/// Payload of the monitoring read endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    /// Aggregate statistics over the live buckets
    #[serde(flatten)]
    pub stats: AggregateStats,
    /// Static host information
    pub system_info: HostInfo,
}
