//! Types for metric samples and aggregation

use serde::Serialize;

/// Memory readings attached to a sample.
///
/// `used_bytes`/`total_bytes` are system-wide; `rss_bytes` is the process
/// resident set. The memory-pressure alert compares `used/total`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MemoryUsage {
    /// System memory in use, bytes
    pub used_bytes: u64,
    /// Total system memory, bytes
    pub total_bytes: u64,
    /// Process resident set size, bytes
    pub rss_bytes: u64,
}

impl MemoryUsage {
    /// Used/total ratio, zero when total is unknown
    pub fn ratio(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_bytes as f64
        }
    }
}

/// Cumulative process CPU time attached to a sample
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CpuUsage {
    /// User-mode CPU time, milliseconds
    pub user_ms: u64,
    /// Kernel-mode CPU time, milliseconds
    pub system_ms: u64,
}

impl CpuUsage {
    /// Combined user and kernel time
    pub fn total_ms(&self) -> u64 {
        self.user_ms.saturating_add(self.system_ms)
    }
}

/// Database statistics forwarded by the host pipeline, when available.
///
/// Handlers that track their query activity can insert this into the request
/// extensions; the governance middleware copies it into the sample.
#[derive(Debug, Clone, Copy)]
pub struct DbQueryStats {
    /// Queries issued while handling the request
    pub query_count: u64,
    /// Total query time in milliseconds
    pub query_time_ms: u64,
}

/// One completed request's metrics. Created once, consumed once by the
/// aggregator, then discarded.
#[derive(Debug, Clone)]
pub struct RequestMetricSample {
    /// Request path
    pub path: String,
    /// HTTP method
    pub method: String,
    /// Response status code
    pub status_code: u16,
    /// Wall-clock handling time in milliseconds
    pub response_time_ms: u64,
    /// Completion time, Unix milliseconds
    pub timestamp_ms: u64,
    /// Memory readings at completion
    pub memory: MemoryUsage,
    /// Cumulative process CPU time at completion
    pub cpu: CpuUsage,
    /// Requests in flight when the sample was taken
    pub concurrent_requests: u64,
    /// System load averages over 1, 5 and 15 minutes
    pub system_load: [f64; 3],
    /// Queries issued by the handler, if the host reported them
    pub db_query_count: Option<u64>,
    /// Handler query time in milliseconds, if reported
    pub db_query_time_ms: Option<u64>,
}

/// One fixed-duration aggregation bucket, keyed by
/// `timestamp_ms / window_size_ms`.
#[derive(Debug, Clone, Serialize)]
pub struct TimeWindowBucket {
    /// Bucket start, Unix milliseconds
    pub bucket_start_ms: u64,
    /// Requests recorded in this bucket
    pub count: u64,
    /// Sum of response times, milliseconds
    pub total_response_time_ms: u64,
    /// Largest single response time, milliseconds
    pub max_response_time_ms: u64,
    /// Requests with status >= 400
    pub error_count: u64,
}

impl TimeWindowBucket {
    pub(super) fn new(bucket_start_ms: u64) -> Self {
        Self {
            bucket_start_ms,
            count: 0,
            total_response_time_ms: 0,
            max_response_time_ms: 0,
            error_count: 0,
        }
    }

    /// Error fraction within the bucket
    pub fn error_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.error_count as f64 / self.count as f64
        }
    }
}

/// Point-in-time aggregate over all live buckets. Derived on demand, never
/// stored.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateStats {
    /// Requests across all live buckets
    pub total_requests: u64,
    /// Mean response time in milliseconds
    pub avg_response_time_ms: f64,
    /// Largest response time across buckets, milliseconds
    pub max_response_time_ms: u64,
    /// Error fraction across all live buckets
    pub error_rate: f64,
    /// Live buckets, most recent first
    pub buckets: Vec<TimeWindowBucket>,
}
