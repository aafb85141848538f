//! Middleware tests

use super::{GovernanceMiddleware, RequestIdMiddleware};
use crate::config::Config;
use crate::monitoring::sampling::HeadSampler;
use crate::server::state::AppState;
use crate::storage::MockCounterStore;
use crate::utils::error::GovernorError;
use actix_web::{App, HttpResponse, test, web};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn governed_config(max_requests: u64, window_ms: u64) -> Config {
    let mut config = Config::default();
    config.rate_limit.max_requests = max_requests;
    config.rate_limit.window_ms = window_ms;
    config
}

/// State with a deterministic always-sample sampler
async fn governed_state(max_requests: u64, window_ms: u64) -> AppState {
    AppState::new(governed_config(max_requests, window_ms))
        .await
        .unwrap()
        .with_sampler(HeadSampler::with_seed(1.0, 1))
}

async fn ok_handler() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn failing_handler() -> Result<HttpResponse, GovernorError> {
    Err(GovernorError::Internal("handler exploded".to_string()))
}

macro_rules! governed_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .wrap(GovernanceMiddleware)
                .route("/api/test", web::get().to(ok_handler))
                .route("/api/fail", web::get().to(failing_handler))
                .route("/health", web::get().to(ok_handler))
                .route("/static/app.css", web::get().to(ok_handler)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_requests_within_limit_are_admitted() {
    let state = governed_state(10, 1_000).await;
    let app = governed_app!(state);

    for _ in 0..10 {
        let res = test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request())
            .await;
        assert!(res.status().is_success());
    }

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        res.headers().get("rate-limit-remaining").unwrap(),
        "0",
        "remaining quota must be zero on rejection"
    );
}

#[actix_web::test]
async fn test_rejection_body_is_structured() {
    let state = governed_state(1, 60_000).await;
    let app = governed_app!(state);

    test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;
    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;

    assert_eq!(res.status().as_u16(), 429);
    assert!(res.headers().contains_key("x-response-time"));
    assert!(res.headers().contains_key("rate-limit-total"));
    assert!(res.headers().contains_key("rate-limit-reset"));

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert!(body["message"].as_str().unwrap().contains("too many requests"));
}

#[actix_web::test]
async fn test_rejected_request_skips_handler_and_aggregator() {
    let state = governed_state(1, 60_000).await;
    let hits = Arc::new(AtomicUsize::new(0));

    let app = {
        let hits = hits.clone();
        test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .wrap(GovernanceMiddleware)
                .route(
                    "/api/test",
                    web::get().to(move || {
                        let hits = hits.clone();
                        async move {
                            hits.fetch_add(1, Ordering::SeqCst);
                            HttpResponse::Ok().body("ok")
                        }
                    }),
                ),
        )
        .await
    };

    test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;
    test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;

    assert_eq!(hits.load(Ordering::SeqCst), 1, "rejected request must not reach the handler");
    let stats = state.monitor.snapshot().unwrap();
    assert_eq!(stats.total_requests, 1, "rejected request must not be recorded");
}

#[actix_web::test]
async fn test_distinct_identities_have_independent_windows() {
    let state = governed_state(1, 60_000).await;
    let app = governed_app!(state);

    let first = test::TestRequest::get()
        .uri("/api/test")
        .peer_addr("203.0.113.1:40000".parse().unwrap())
        .to_request();
    assert!(test::call_service(&app, first).await.status().is_success());

    let same_identity = test::TestRequest::get()
        .uri("/api/test")
        .peer_addr("203.0.113.1:40001".parse().unwrap())
        .to_request();
    assert_eq!(
        test::call_service(&app, same_identity).await.status().as_u16(),
        429
    );

    let other_identity = test::TestRequest::get()
        .uri("/api/test")
        .peer_addr("203.0.113.2:40000".parse().unwrap())
        .to_request();
    assert!(test::call_service(&app, other_identity).await.status().is_success());
}

#[actix_web::test]
async fn test_response_time_header_on_success() {
    let state = governed_state(100, 60_000).await;
    let app = governed_app!(state);

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;
    let header = res.headers().get("x-response-time").unwrap().to_str().unwrap();
    assert!(header.ends_with("ms"), "got {:?}", header);
    assert!(header.trim_end_matches("ms").parse::<u64>().is_ok());
}

#[actix_web::test]
async fn test_rate_headers_on_admitted_response() {
    let state = governed_state(10, 60_000).await;
    let app = governed_app!(state);

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;
    assert_eq!(res.headers().get("rate-limit-total").unwrap(), "10");
    assert_eq!(res.headers().get("rate-limit-remaining").unwrap(), "9");
    assert!(res.headers().contains_key("rate-limit-reset"));
}

#[actix_web::test]
async fn test_handler_failure_keeps_timing_and_is_recorded() {
    let state = governed_state(100, 60_000).await;
    let app = governed_app!(state);

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/fail").to_request()).await;
    assert_eq!(res.status().as_u16(), 500);
    assert!(
        res.headers().contains_key("x-response-time"),
        "timing must be visible on handler failure"
    );

    let stats = state.monitor.snapshot().unwrap();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.error_rate, 1.0);
}

#[actix_web::test]
async fn test_exempt_paths_get_header_but_no_sample() {
    let state = governed_state(100, 60_000).await;
    let app = governed_app!(state);

    for uri in ["/health", "/static/app.css"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert!(res.status().is_success());
        assert!(res.headers().contains_key("x-response-time"));
    }

    assert!(
        state.monitor.snapshot().is_none(),
        "lightweight paths must never be sampled"
    );
}

#[actix_web::test]
async fn test_zero_sample_rate_records_nothing() {
    let state = AppState::new(governed_config(100, 60_000))
        .await
        .unwrap()
        .with_sampler(HeadSampler::with_seed(0.0, 1));
    let app = governed_app!(state);

    for _ in 0..5 {
        let res = test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request())
            .await;
        assert!(res.status().is_success());
        assert!(res.headers().contains_key("x-response-time"));
    }

    assert!(state.monitor.snapshot().is_none());
}

#[actix_web::test]
async fn test_store_outage_rejects_at_http_level() {
    let mut store = MockCounterStore::new();
    store
        .expect_prune_insert_count()
        .returning(|_, _, _, _| Err(GovernorError::Internal("store down".to_string())));

    let state = AppState::with_store(governed_config(100, 60_000), Arc::new(store))
        .with_sampler(HeadSampler::with_seed(1.0, 1));
    let app = governed_app!(state);

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;
    assert_eq!(
        res.status().as_u16(),
        429,
        "store outage must fail closed, not open"
    );
}

#[actix_web::test]
async fn test_disabled_rate_limit_passes_everything() {
    let mut config = governed_config(1, 60_000);
    config.rate_limit.enabled = false;
    let state = AppState::new(config)
        .await
        .unwrap()
        .with_sampler(HeadSampler::with_seed(1.0, 1));
    let app = governed_app!(state);

    for _ in 0..5 {
        let res = test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request())
            .await;
        assert!(res.status().is_success());
    }
}

#[actix_web::test]
async fn test_request_id_header_is_set() {
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .route("/api/test", web::get().to(ok_handler)),
    )
    .await;

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/test").to_request()).await;
    let id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
