//! Monitoring and observability for the governance layer
//!
//! Time-windowed telemetry aggregation, threshold alerting, host/process
//! metric collection, and the sampling predicates used by the middleware.

pub mod metrics;
pub mod sampling;
