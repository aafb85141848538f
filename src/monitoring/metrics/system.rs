//! Process and host metrics collection using the sysinfo crate
//!
//! Gathering a full sample refreshes memory and pid-scoped process data, so
//! the middleware only invokes it for sampled requests.

use super::types::{CpuUsage, DbQueryStats, MemoryUsage, RequestMetricSample};
use crate::utils::clock::current_millis;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Point-in-time process/host metrics provider.
///
/// Also owns the in-flight request gauge; the middleware holds an
/// [`InFlightGuard`] for the lifetime of each admitted request.
pub struct ProcessMetricsProvider {
    system: Mutex<System>,
    pid: Pid,
    started_at: Instant,
    in_flight: AtomicU64,
}

impl ProcessMetricsProvider {
    /// Provider for the current process
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new_all()),
            pid: sysinfo::get_current_pid().unwrap_or(Pid::from_u32(0)),
            started_at: Instant::now(),
            in_flight: AtomicU64::new(0),
        }
    }

    /// Assemble a full metric sample for a completed request.
    ///
    /// Metric gathering never fails into the request path: readings that
    /// cannot be obtained are recorded as zeros.
    pub fn sample(
        &self,
        path: &str,
        method: &str,
        status_code: u16,
        response_time_ms: u64,
        db: Option<DbQueryStats>,
    ) -> RequestMetricSample {
        let load = System::load_average();

        RequestMetricSample {
            path: path.to_string(),
            method: method.to_string(),
            status_code,
            response_time_ms,
            timestamp_ms: current_millis(),
            memory: self.memory(),
            cpu: cpu_times(),
            concurrent_requests: self.in_flight(),
            system_load: [load.one, load.five, load.fifteen],
            db_query_count: db.map(|d| d.query_count),
            db_query_time_ms: db.map(|d| d.query_time_ms),
        }
    }

    /// Current memory readings
    pub fn memory(&self) -> MemoryUsage {
        let mut system = self.system.lock();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), false);

        MemoryUsage {
            used_bytes: system.used_memory(),
            total_bytes: system.total_memory(),
            rss_bytes: system.process(self.pid).map(|p| p.memory()).unwrap_or(0),
        }
    }

    /// Total system memory in bytes
    pub fn total_memory(&self) -> u64 {
        let mut system = self.system.lock();
        system.refresh_memory();
        system.total_memory()
    }

    /// Free system memory in bytes
    pub fn free_memory(&self) -> u64 {
        let mut system = self.system.lock();
        system.refresh_memory();
        system.free_memory()
    }

    /// Logical CPU count
    pub fn cpu_count(&self) -> usize {
        self.system.lock().cpus().len()
    }

    /// Time since the provider (effectively the process) started
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Requests currently in flight
    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Track one in-flight request; the gauge drops with the guard, on
    /// success, failure or panic alike.
    pub fn track(self: &Arc<Self>) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard {
            provider: Arc::clone(self),
        }
    }
}

impl Default for ProcessMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProcessMetricsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessMetricsProvider")
            .field("pid", &self.pid)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

/// RAII handle decrementing the in-flight gauge on drop
pub struct InFlightGuard {
    provider: Arc<ProcessMetricsProvider>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.provider.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Cumulative process CPU time.
///
/// sysinfo exposes only instantaneous CPU percentages, so on Linux this reads
/// utime/stime from `/proc/self/stat` (clock ticks, 100 Hz on mainstream
/// kernels). Elsewhere it reports zeros, which disables the CPU alert rather
/// than aborting the sample.
#[cfg(target_os = "linux")]
fn cpu_times() -> CpuUsage {
    const MS_PER_TICK: u64 = 10;

    let Ok(stat) = std::fs::read_to_string("/proc/self/stat") else {
        return CpuUsage::default();
    };
    // The comm field may contain spaces; fields are stable after the ')'
    let Some(rest) = stat.rsplit(')').next() else {
        return CpuUsage::default();
    };
    let fields: Vec<&str> = rest.split_whitespace().collect();
    // After comm: state is field 0, utime field 11, stime field 12
    if fields.len() <= 12 {
        return CpuUsage::default();
    }

    CpuUsage {
        user_ms: fields[11].parse::<u64>().unwrap_or(0) * MS_PER_TICK,
        system_ms: fields[12].parse::<u64>().unwrap_or(0) * MS_PER_TICK,
    }
}

#[cfg(not(target_os = "linux"))]
fn cpu_times() -> CpuUsage {
    CpuUsage::default()
}
