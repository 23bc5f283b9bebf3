//! HTTP API exposing the configuration store.
//!
//! # Responsibilities
//! - Build the Axum router with all handlers
//! - Wire up middleware (auth, request ID, tracing, timeout, metrics)
//! - Map store error kinds onto protocol status codes

pub mod auth;
pub mod handlers;
pub mod server;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::observability::metrics;
use crate::settings::Settings;
use crate::store::ConfigStore;

use self::auth::auth_middleware;
use self::handlers::*;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<ConfigStore>,
    pub settings: Arc<Settings>,
}

/// Request-ID source: a fresh UUID v4 per request.
#[derive(Clone, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the API router with all middleware layers.
pub fn build_router(state: ApiState) -> Router {
    let timeout = Duration::from_secs(state.settings.api.request_timeout_secs);
    Router::new()
        .route("/v1/status", get(get_status))
        .route("/v1/version", get(get_version))
        .route(
            "/v1/config/frontends",
            get(list_frontends).post(create_frontend),
        )
        .route(
            "/v1/config/frontends/{name}",
            get(get_frontend).put(edit_frontend).delete(delete_frontend),
        )
        .route("/v1/config/farms", get(list_farms).post(create_farm))
        .route(
            "/v1/config/farms/{name}",
            get(get_farm).put(edit_farm).delete(delete_farm),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn(track_metrics))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

/// Record per-request metrics around the rest of the stack.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}
