//! Edge gate for logged-out sessions.
//!
//! Runs before any page or API handler. A protected request that still
//! carries the logout cookie is sent to the login page and the cookie is
//! removed in the same response. Public paths always pass through.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sellah_core::{
    FlagStorage, LOGOUT_COOKIE_NAME, RouteAccess, SESSION_EXPIRED_REDIRECT,
    session::LOGOUT_COOKIE_VALUE,
};

use crate::session::{CookiePolicy, CookieStorage};

/// What the gate does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    PassThrough,
    Redirect,
}

/// Decide from the path and the request's cookies alone.
#[must_use]
pub fn gate_decision(path: &str, cookies: &CookieStorage) -> GateDecision {
    if RouteAccess::classify(path).is_public() {
        return GateDecision::PassThrough;
    }

    match cookies.read(LOGOUT_COOKIE_NAME) {
        Ok(Some(value)) if value == LOGOUT_COOKIE_VALUE => GateDecision::Redirect,
        _ => GateDecision::PassThrough,
    }
}

/// Gate middleware. Takes the cookie policy as state so it can sit in front
/// of any router.
pub async fn logout_gate_middleware(
    State(policy): State<CookiePolicy>,
    request: Request,
    next: Next,
) -> Response {
    let mut cookies = CookieStorage::from_headers(request.headers(), policy);

    match gate_decision(request.uri().path(), &cookies) {
        GateDecision::PassThrough => next.run(request).await,
        GateDecision::Redirect => {
            tracing::info!(
                path = %request.uri().path(),
                redirect = SESSION_EXPIRED_REDIRECT,
                "logged-out session stopped at gate"
            );
            cookies.delete(LOGOUT_COOKIE_NAME);
            redirect_clearing_cookie(&cookies)
        }
    }
}

fn redirect_clearing_cookie(cookies: &CookieStorage) -> Response {
    let mut response = Redirect::to(SESSION_EXPIRED_REDIRECT).into_response();
    cookies.apply(response.headers_mut());
    response
}
