//! Telemetry aggregator implementation

use super::alerts::{AlertEvent, AlertSink, TracingSink};
use super::types::{AggregateStats, RequestMetricSample, TimeWindowBucket};
use crate::config::MonitoringConfig;
use crate::utils::clock::current_millis;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Rolling-window performance monitor.
///
/// An explicitly constructed instance (no process-wide statics): the host
/// creates one per process and shares it via `Arc`. The bucket map is
/// process-local, never persisted, and bounded to `window_count + 1` buckets
/// by eviction on every record and snapshot.
///
/// `record` and `snapshot` never perform I/O; the only synchronization is a
/// short-lived lock around the bucket map, so they are safe to call from any
/// number of concurrent requests.
pub struct PerformanceMonitor {
    config: MonitoringConfig,
    buckets: RwLock<HashMap<u64, TimeWindowBucket>>,
    started_at: Instant,
    sink: Arc<dyn AlertSink>,
}

impl PerformanceMonitor {
    /// Monitor reporting alerts through the given sink
    pub fn new(config: MonitoringConfig, sink: Arc<dyn AlertSink>) -> Self {
        Self {
            config,
            buckets: RwLock::new(HashMap::new()),
            started_at: Instant::now(),
            sink,
        }
    }

    /// Monitor reporting alerts through `tracing` warnings
    pub fn with_defaults(config: MonitoringConfig) -> Self {
        Self::new(config, Arc::new(TracingSink))
    }

    /// The monitoring configuration
    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    /// Fold one sample into its time bucket and evaluate alert thresholds.
    ///
    /// Synchronous and non-blocking; alert evaluation happens after the
    /// bucket lock is released.
    pub fn record(&self, sample: &RequestMetricSample) {
        let bucket_key = sample.timestamp_ms / self.config.window_size_ms;

        let (bucket_start_ms, bucket_error_rate) = {
            let mut buckets = self.buckets.write();
            Self::evict_stale(&mut buckets, bucket_key, self.config.window_count);

            let bucket = buckets
                .entry(bucket_key)
                .or_insert_with(|| TimeWindowBucket::new(bucket_key * self.config.window_size_ms));

            bucket.count += 1;
            bucket.total_response_time_ms += sample.response_time_ms;
            bucket.max_response_time_ms = bucket.max_response_time_ms.max(sample.response_time_ms);
            if sample.status_code >= 400 {
                bucket.error_count += 1;
            }

            (bucket.bucket_start_ms, bucket.error_rate())
        };

        self.evaluate_thresholds(sample, bucket_start_ms, bucket_error_rate);
    }

    /// Aggregate statistics over all live buckets, or `None` when nothing
    /// has been recorded within the retention horizon.
    pub fn snapshot(&self) -> Option<AggregateStats> {
        self.snapshot_at(current_millis())
    }

    /// Snapshot as of an explicit point in time.
    ///
    /// Buckets that have fallen outside the retention horizon relative to
    /// `now_ms` are evicted first.
    pub fn snapshot_at(&self, now_ms: u64) -> Option<AggregateStats> {
        let current_key = now_ms / self.config.window_size_ms;

        let mut buckets = self.buckets.write();
        Self::evict_stale(&mut buckets, current_key, self.config.window_count);

        if buckets.is_empty() {
            return None;
        }

        let mut total_requests = 0u64;
        let mut total_response_time = 0u64;
        let mut max_response_time = 0u64;
        let mut total_errors = 0u64;

        let mut live: Vec<TimeWindowBucket> = buckets.values().cloned().collect();
        drop(buckets);

        for bucket in &live {
            total_requests += bucket.count;
            total_response_time += bucket.total_response_time_ms;
            max_response_time = max_response_time.max(bucket.max_response_time_ms);
            total_errors += bucket.error_count;
        }
        live.sort_by(|a, b| b.bucket_start_ms.cmp(&a.bucket_start_ms));

        Some(AggregateStats {
            total_requests,
            avg_response_time_ms: total_response_time as f64 / total_requests as f64,
            max_response_time_ms: max_response_time,
            error_rate: total_errors as f64 / total_requests as f64,
            buckets: live,
        })
    }

    /// Drop buckets older than the retention horizon
    fn evict_stale(
        buckets: &mut HashMap<u64, TimeWindowBucket>,
        current_key: u64,
        window_count: u64,
    ) {
        let oldest_allowed = current_key.saturating_sub(window_count);
        buckets.retain(|&key, _| key >= oldest_allowed);
    }

    /// Evaluate the independent threshold checks for one sample. Each breach
    /// produces its own event; several may fire for the same sample.
    fn evaluate_thresholds(
        &self,
        sample: &RequestMetricSample,
        bucket_start_ms: u64,
        bucket_error_rate: f64,
    ) {
        let thresholds = &self.config.thresholds;

        if sample.response_time_ms > thresholds.response_time_ms {
            self.sink.alert(AlertEvent::SlowResponse {
                path: sample.path.clone(),
                method: sample.method.clone(),
                response_time_ms: sample.response_time_ms,
                threshold_ms: thresholds.response_time_ms,
            });
        }

        let memory_ratio = sample.memory.ratio();
        if memory_ratio > thresholds.memory_ratio {
            self.sink.alert(AlertEvent::MemoryPressure {
                used_bytes: sample.memory.used_bytes,
                total_bytes: sample.memory.total_bytes,
                ratio: memory_ratio,
                threshold: thresholds.memory_ratio,
            });
        }

        let uptime_ms = self.started_at.elapsed().as_millis() as u64;
        if uptime_ms > 0 {
            let cpu_ratio = sample.cpu.total_ms() as f64 / uptime_ms as f64;
            if cpu_ratio > thresholds.cpu_ratio {
                self.sink.alert(AlertEvent::CpuPressure {
                    cpu_time_ms: sample.cpu.total_ms(),
                    uptime_ms,
                    ratio: cpu_ratio,
                    threshold: thresholds.cpu_ratio,
                });
            }
        }

        if bucket_error_rate > thresholds.error_rate {
            self.sink.alert(AlertEvent::ErrorRateHigh {
                bucket_start_ms,
                rate: bucket_error_rate,
                threshold: thresholds.error_rate,
            });
        }

        if sample.concurrent_requests > thresholds.concurrent_requests {
            self.sink.alert(AlertEvent::ConcurrencyHigh {
                in_flight: sample.concurrent_requests,
                threshold: thresholds.concurrent_requests,
            });
        }
    }

    /// Number of live buckets, for tests and diagnostics
    pub fn bucket_count(&self) -> usize {
        self.buckets.read().len()
    }
}

impl std::fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceMonitor")
            .field("buckets", &self.bucket_count())
            .field("window_size_ms", &self.config.window_size_ms)
            .field("window_count", &self.config.window_count)
            .finish()
    }
}
