//! Governance middleware: admission control, timing and telemetry
//!
//! One integration point per request: the admission check runs before the
//! downstream handler, telemetry records after it. A rejected request is
//! answered directly (429 plus rate headers) without invoking the handler or
//! the aggregator; every response, including rejections and handler
//! failures, carries the response-time header.

use crate::core::rate_limiter::RateLimitDecision;
use crate::monitoring::metrics::DbQueryStats;
use crate::monitoring::sampling::{MonitorMode, classify_path};
use crate::server::state::AppState;
use crate::server::types::ApiResponse;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::{HttpMessage, HttpResponse, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Instant;
use tracing::warn;

/// Governance middleware for Actix-web
pub struct GovernanceMiddleware;

impl<S, B> Transform<S, ServiceRequest> for GovernanceMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = GovernanceMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GovernanceMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for the governance middleware
pub struct GovernanceMiddlewareService<S> {
    // Rc because the admission check awaits before the downstream call
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for GovernanceMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                // No governance state mounted; pass through untouched
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            };

            let path = req.path().to_string();
            let method = req.method().to_string();
            let start = Instant::now();

            let decision = if state.config.rate_limit.enabled {
                let identity = client_identity(&req);
                Some(state.limiter.check_and_consume(&identity).await)
            } else {
                None
            };

            if let Some(decision) = decision.as_ref().filter(|d| d.limited) {
                warn!(%path, %method, count = decision.current_count, "request rate limited");

                let mut response = HttpResponse::TooManyRequests()
                    .json(ApiResponse::<()>::error("too many requests, retry later"));
                set_response_time(response.headers_mut(), start.elapsed().as_millis() as u64);
                set_rate_headers(response.headers_mut(), decision);

                return Ok(req.into_response(response).map_into_right_body());
            }

            let mode = classify_path(&path, &state.config.monitoring);
            let guard = state.metrics.track();

            let mut res = service.call(req).await?;

            let elapsed_ms = start.elapsed().as_millis() as u64;
            set_response_time(res.headers_mut(), elapsed_ms);
            if let Some(decision) = decision.as_ref() {
                set_rate_headers(res.headers_mut(), decision);
            }

            if mode == MonitorMode::Full && state.sampler.should_sample() {
                let db = res.request().extensions().get::<DbQueryStats>().copied();
                let sample = state.metrics.sample(
                    &path,
                    &method,
                    res.status().as_u16(),
                    elapsed_ms,
                    db,
                );
                state.monitor.record(&sample);
            }
            drop(guard);

            Ok(res.map_into_left_body())
        })
    }
}

/// Identity under which rate-limit state is tracked: the client address as
/// reported by the connection (honoring proxy forwarding headers). A missing
/// peer address maps to a shared bucket rather than bypassing admission.
fn client_identity(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_response_time(headers: &mut HeaderMap, elapsed_ms: u64) {
    if let Ok(value) = HeaderValue::from_str(&format!("{}ms", elapsed_ms)) {
        headers.insert(HeaderName::from_static("x-response-time"), value);
    }
}

fn set_rate_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    if let Ok(value) = HeaderValue::from_str(&decision.limit.to_string()) {
        headers.insert(HeaderName::from_static("rate-limit-total"), value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        headers.insert(HeaderName::from_static("rate-limit-remaining"), value);
    }
    // Reset is reported in epoch seconds
    if let Ok(value) = HeaderValue::from_str(&(decision.reset_at_ms / 1000).to_string()) {
        headers.insert(HeaderName::from_static("rate-limit-reset"), value);
    }
}
