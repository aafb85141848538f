//! HTTP middleware implementations
//!
//! This module provides the middleware for request governance:
//! - Admission control, timing and telemetry (governance)
//! - Request ID tracking

mod governance;
mod request_id;

#[cfg(test)]
mod tests;

// Re-export all middleware
pub use governance::{GovernanceMiddleware, GovernanceMiddlewareService};
pub use request_id::{RequestIdMiddleware, RequestIdMiddlewareService};
