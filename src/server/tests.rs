//! Tests for the monitoring read surface

use crate::config::Config;
use crate::monitoring::metrics::{CpuUsage, MemoryUsage, RequestMetricSample};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::clock::current_millis;
use actix_web::{App, test, web};

async fn state() -> AppState {
    AppState::new(Config::default()).await.unwrap()
}

fn sample(status_code: u16, response_time_ms: u64) -> RequestMetricSample {
    RequestMetricSample {
        path: "/api/users".to_string(),
        method: "GET".to_string(),
        status_code,
        response_time_ms,
        timestamp_ms: current_millis(),
        memory: MemoryUsage::default(),
        cpu: CpuUsage::default(),
        concurrent_requests: 1,
        system_load: [0.0, 0.0, 0.0],
        db_query_count: None,
        db_query_time_ms: None,
    }
}

#[actix_web::test]
async fn test_metrics_endpoint_reports_no_data() {
    let state = state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/monitor/metrics").to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 404);

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}

#[actix_web::test]
async fn test_metrics_endpoint_returns_aggregates_and_host_info() {
    let state = state().await;
    state.monitor.record(&sample(200, 120));
    state.monitor.record(&sample(500, 80));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/monitor/metrics").to_request(),
    )
    .await;
    assert!(res.status().is_success());

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["total_requests"], 2);
    assert_eq!(data["error_rate"], 0.5);
    assert_eq!(data["max_response_time_ms"], 120);
    assert!(data["buckets"].is_array());

    let system_info = &data["system_info"];
    assert!(system_info["cpu_count"].as_u64().unwrap() >= 1);
    assert!(system_info["total_memory_bytes"].as_u64().unwrap() > 0);
    assert_eq!(system_info["platform"], std::env::consts::OS);
}

#[actix_web::test]
async fn test_metrics_endpoint_is_read_only() {
    let state = state().await;
    state.monitor.record(&sample(200, 50));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure),
    )
    .await;

    for _ in 0..3 {
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/monitor/metrics").to_request(),
        )
        .await;
        assert!(res.status().is_success());
    }

    // Reading the monitor must not change what it reports
    assert_eq!(state.monitor.snapshot().unwrap().total_requests, 1);
}

#[actix_web::test]
async fn test_health_endpoint() {
    let state = state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(res.status().is_success());

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], crate::VERSION);
}
