//! Structured alert events and the observability sink
//!
//! Alerts are side-channel warnings, never errors: the sink must not affect
//! control flow, and several events may fire for a single sample.

use tracing::warn;

/// A threshold breach detected while recording a sample
#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
    /// Single request exceeded the response-time threshold
    SlowResponse {
        path: String,
        method: String,
        response_time_ms: u64,
        threshold_ms: u64,
    },
    /// System memory utilization exceeded the configured ratio
    MemoryPressure {
        used_bytes: u64,
        total_bytes: u64,
        ratio: f64,
        threshold: f64,
    },
    /// Process CPU time is too large a fraction of wall-clock uptime
    CpuPressure {
        cpu_time_ms: u64,
        uptime_ms: u64,
        ratio: f64,
        threshold: f64,
    },
    /// Current bucket's error rate exceeded the configured fraction
    ErrorRateHigh {
        bucket_start_ms: u64,
        rate: f64,
        threshold: f64,
    },
    /// In-flight request count exceeded the configured ceiling
    ConcurrencyHigh { in_flight: u64, threshold: u64 },
}

/// Destination for alert and informational events
pub trait AlertSink: Send + Sync {
    /// Report a threshold breach
    fn alert(&self, event: AlertEvent);

    /// Report an informational event
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Default sink: structured `tracing` warnings
#[derive(Debug, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn alert(&self, event: AlertEvent) {
        match event {
            AlertEvent::SlowResponse {
                path,
                method,
                response_time_ms,
                threshold_ms,
            } => warn!(
                %path, %method, response_time_ms, threshold_ms,
                "response time exceeded threshold"
            ),
            AlertEvent::MemoryPressure {
                used_bytes,
                total_bytes,
                ratio,
                threshold,
            } => warn!(
                used_bytes, total_bytes,
                ratio = format_args!("{:.2}", ratio),
                threshold,
                "memory utilization exceeded threshold"
            ),
            AlertEvent::CpuPressure {
                cpu_time_ms,
                uptime_ms,
                ratio,
                threshold,
            } => warn!(
                cpu_time_ms, uptime_ms,
                ratio = format_args!("{:.2}", ratio),
                threshold,
                "CPU utilization exceeded threshold"
            ),
            AlertEvent::ErrorRateHigh {
                bucket_start_ms,
                rate,
                threshold,
            } => warn!(
                bucket_start_ms,
                rate = format_args!("{:.2}", rate),
                threshold,
                "error rate exceeded threshold"
            ),
            AlertEvent::ConcurrencyHigh {
                in_flight,
                threshold,
            } => warn!(in_flight, threshold, "concurrent requests exceeded threshold"),
        }
    }
}
