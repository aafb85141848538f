//! Application state shared across the middleware and handlers
//!
//! This module provides the AppState struct and its implementations.

use crate::config::{Config, CounterStoreDriver};
use crate::core::rate_limiter::SlidingWindowLimiter;
use crate::monitoring::metrics::{PerformanceMonitor, ProcessMetricsProvider};
use crate::monitoring::sampling::HeadSampler;
use crate::storage::{CounterStore, MemoryCounterStore, RedisPool};
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// Governance state shared across request handlers.
///
/// All fields are wrapped in Arc for efficient sharing across threads; the
/// struct itself is cheap to clone into each worker.
#[derive(Clone)]
pub struct AppState {
    /// Governance configuration (shared read-only)
    pub config: Arc<Config>,
    /// Admission controller
    pub limiter: Arc<SlidingWindowLimiter>,
    /// Telemetry aggregator
    pub monitor: Arc<PerformanceMonitor>,
    /// Head-based sampler
    pub sampler: Arc<HeadSampler>,
    /// Process/host metrics provider and in-flight gauge
    pub metrics: Arc<ProcessMetricsProvider>,
}

impl AppState {
    /// Build the governance state, connecting to the configured counter
    /// store driver.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let store: Arc<dyn CounterStore> = match config.rate_limit.driver {
            CounterStoreDriver::Memory => {
                info!("Using in-process counter store");
                Arc::new(MemoryCounterStore::new())
            }
            CounterStoreDriver::Redis => Arc::new(RedisPool::connect(&config.redis).await?),
        };

        Ok(Self::with_store(config, store))
    }

    /// Build the governance state over an explicit counter store.
    ///
    /// Useful for tests and for hosts that manage their own store
    /// connections.
    pub fn with_store(config: Config, store: Arc<dyn CounterStore>) -> Self {
        let limiter = Arc::new(SlidingWindowLimiter::new(
            store,
            config.rate_limit.clone(),
        ));
        let monitor = Arc::new(PerformanceMonitor::with_defaults(config.monitoring.clone()));
        let sampler = Arc::new(HeadSampler::new(config.monitoring.sample_rate));

        Self {
            config: Arc::new(config),
            limiter,
            monitor,
            sampler,
            metrics: Arc::new(ProcessMetricsProvider::new()),
        }
    }

    /// Replace the sampler, e.g. with a seeded one in tests
    pub fn with_sampler(mut self, sampler: HeadSampler) -> Self {
        self.sampler = Arc::new(sampler);
        self
    }

    /// Get governance configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
