//! # request-governor
//!
//! Request-governance middleware for Actix-web services: a sliding-window
//! admission controller backed by a shared counter store, and a time-windowed
//! telemetry aggregator with synchronous threshold alerting.
//!
//! ## Features
//!
//! - **Sliding-window rate limiting**: atomic prune/insert/count against Redis
//!   (shared across instances) or an in-process store, with fail-closed
//!   behavior when the store is unavailable
//! - **Rolling telemetry**: fixed-size time buckets with bounded retention,
//!   on-demand aggregate snapshots, and per-sample alert evaluation
//! - **Head-based sampling**: only a configurable fraction of requests pays
//!   the full metric-collection cost; exempt paths get a timing header only
//! - **Drop-in middleware**: one governance middleware plus a read-only
//!   monitoring endpoint to mount on any Actix-web `App`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use request_governor::{AppState, Config, GovernanceMiddleware};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Config::default()).await?;
//!
//!     HttpServer::new(move || {
//!         App::new()
//!             .app_data(web::Data::new(state.clone()))
//!             .wrap(GovernanceMiddleware)
//!             .configure(request_governor::server::routes::configure)
//!     })
//!     .bind(("127.0.0.1", 8080))?
//!     .run()
//!     .await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::{Config, MonitoringConfig, RateLimitConfig, RedisConfig};
pub use core::rate_limiter::{RateLimitDecision, SlidingWindowLimiter};
pub use monitoring::metrics::{
    AggregateStats, AlertEvent, AlertSink, PerformanceMonitor, ProcessMetricsProvider,
    RequestMetricSample, TracingSink,
};
pub use monitoring::sampling::{HeadSampler, MonitorMode, classify_path};
pub use server::middleware::{GovernanceMiddleware, RequestIdMiddleware};
pub use server::state::AppState;
pub use storage::{CounterStore, MemoryCounterStore, RedisPool};
pub use utils::error::{GovernorError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
