//! Error handling for the governance layer
//!
//! This module defines all error types used throughout the crate.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the governance layer
pub type Result<T> = std::result::Result<T, GovernorError>;

/// Main error type for the governance layer
#[derive(Error, Debug)]
pub enum GovernorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Counter store (Redis) errors
    #[error("Counter store error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Counter store operation timed out
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Monitoring errors
    #[error("Monitoring error: {0}")]
    Monitoring(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GovernorError {
    /// Whether the error belongs to the transient class that earns a single
    /// reconnect-and-retry before the admission controller fails closed.
    ///
    /// Covers replica/cluster transitions where a fresh connection is likely
    /// to reach a writable node. Timeouts and connection refusals are not
    /// retryable: the store is unreachable and the check must fail closed
    /// immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            GovernorError::Redis(e) => matches!(
                e.kind(),
                redis::ErrorKind::ReadOnly
                    | redis::ErrorKind::TryAgain
                    | redis::ErrorKind::ClusterDown
                    | redis::ErrorKind::MasterDown
            ),
            _ => false,
        }
    }
}

impl ResponseError for GovernorError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, message) = match self {
            GovernorError::RateLimit(_) => (
                actix_web::http::StatusCode::TOO_MANY_REQUESTS,
                self.to_string(),
            ),
            GovernorError::Timeout(_) => (
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                self.to_string(),
            ),
            GovernorError::Redis(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Counter store operation failed".to_string(),
            ),
            GovernorError::Config(_) | GovernorError::Yaml(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                self.to_string(),
            ),
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        HttpResponse::build(status_code).json(serde_json::json!({
            "success": false,
            "message": message,
            "data": null,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_429() {
        let err = GovernorError::RateLimit("too many requests".to_string());
        let res = err.error_response();
        assert_eq!(res.status(), actix_web::http::StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_non_redis_errors_are_not_retryable() {
        assert!(!GovernorError::Config("bad".into()).is_retryable());
        assert!(!GovernorError::Timeout("slow".into()).is_retryable());
        assert!(!GovernorError::Internal("boom".into()).is_retryable());
    }

    #[test]
    fn test_readonly_redis_error_is_retryable() {
        let redis_err =
            redis::RedisError::from((redis::ErrorKind::ReadOnly, "READONLY replica"));
        assert!(GovernorError::Redis(redis_err).is_retryable());
    }

    #[test]
    fn test_io_redis_error_is_not_retryable() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        assert!(!GovernorError::Redis(redis_err).is_retryable());
    }
}
