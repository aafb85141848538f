//! Monitoring-path classification and head-based sampling
//!
//! Classification is a pure predicate over the request path so it can be
//! tested independently of the sampler and the aggregator.

use crate::config::MonitoringConfig;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// How much monitoring a request path receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorMode {
    /// Timing header only; never sampled into the aggregator
    Lightweight,
    /// Eligible for full metric collection, subject to sampling
    Full,
}

/// Classify a request path against the configured exemptions.
///
/// Static assets, health checks and the monitoring read surface itself stay
/// lightweight so the measurement system does not measure itself.
pub fn classify_path(path: &str, config: &MonitoringConfig) -> MonitorMode {
    if config.health_paths.iter().any(|p| p == path) {
        return MonitorMode::Lightweight;
    }
    if config
        .exempt_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
    {
        return MonitorMode::Lightweight;
    }
    MonitorMode::Full
}

/// Head-based sampler: decides up front whether a request pays the full
/// metric-collection cost.
#[derive(Debug)]
pub struct HeadSampler {
    rate: f64,
    rng: Mutex<SmallRng>,
}

impl HeadSampler {
    /// Sampler with an entropy-seeded RNG
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Sampler with a fixed seed, for deterministic tests
    pub fn with_seed(rate: f64, seed: u64) -> Self {
        Self {
            rate,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// The configured sampling rate
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Whether the current request should be fully sampled
    pub fn should_sample(&self) -> bool {
        if self.rate >= 1.0 {
            return true;
        }
        if self.rate <= 0.0 {
            return false;
        }
        self.rng.lock().r#gen::<f64>() < self.rate
    }
}
