//! Sellah seller dashboard.
//!
//! Hosts the session-invalidation protocol on the server: the logout gate in
//! front of every gated route, the mount-time guard around pages, and the
//! event endpoint that drives the navigation and visibility watchers.
//!
//! The crate is a library so the router can be started from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::state::AppState;

/// Build the dashboard router.
///
/// `/health` and `/static` sit outside the logout gate; everything else is
/// gated. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let policy = state.cookie_policy();

    let pages = routes::page_routes().layer(from_fn_with_state(
        policy,
        middleware::page_guard_middleware,
    ));

    let gated = Router::new()
        .merge(pages)
        .nest("/api", routes::api_routes())
        .layer(middleware::create_session_layer(state.config()))
        .layer(from_fn_with_state(
            policy,
            middleware::logout_gate_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(&state.config().static_dir))
        .merge(gated)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
