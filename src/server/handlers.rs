//! HTTP route handlers for the monitoring read surface
//!
//! Read-only: callers get a point-in-time snapshot; nothing here mutates
//! governance state. Authorization for the metrics endpoint is the host
//! application's concern (mount it behind the host's admin guard).

use crate::server::state::AppState;
use crate::server::types::{ApiResponse, HostInfo, MonitorReport};
use actix_web::{HttpResponse, web};

/// `GET /api/monitor/metrics` — aggregate statistics plus host info
pub async fn monitor_metrics(state: web::Data<AppState>) -> HttpResponse {
    match state.monitor.snapshot() {
        Some(stats) => {
            let report = MonitorReport {
                stats,
                system_info: host_info(&state),
            };
            HttpResponse::Ok().json(ApiResponse::ok("monitoring data", report))
        }
        None => {
            HttpResponse::NotFound().json(ApiResponse::<MonitorReport>::error("no monitoring data"))
        }
    }
}

/// `GET /health` — liveness probe
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "uptime_secs": state.metrics.uptime().as_secs(),
        "version": crate::VERSION,
    }))
}

fn host_info(state: &AppState) -> HostInfo {
    HostInfo {
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        cpu_count: state.metrics.cpu_count(),
        total_memory_bytes: state.metrics.total_memory(),
        free_memory_bytes: state.metrics.free_memory(),
        uptime_secs: state.metrics.uptime().as_secs(),
    }
}
