//! Route configuration for the governance read surface

use crate::server::handlers;
use actix_web::web;

/// Mount the monitoring and health endpoints on a host application.
///
/// ```rust,ignore
/// App::new().configure(request_governor::server::routes::configure)
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/monitor").route("/metrics", web::get().to(handlers::monitor_metrics)),
    )
    .route("/health", web::get().to(handlers::health));
}
