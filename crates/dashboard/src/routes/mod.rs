//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (outside the logout gate)
//! GET  /static/*               - Static assets (outside the logout gate)
//!
//! # Public pages
//! GET  /                       - Home
//! GET  /about                  - About
//! GET  /register               - Registration info
//! GET  /forgot-password        - Password help
//! GET  /login                  - Login page (session-expired / logout banners)
//! POST /login                  - Login action
//!
//! # Session
//! POST /logout                 - Explicit logout
//! POST /session/expire         - Forced logout after inactivity
//!
//! # Dashboard (requires seller)
//! GET  /dashboard              - Overview with order status legend
//!
//! # API
//! POST /api/session/events     - Navigation / visibility watcher events
//! GET  /api/orders/status      - Badge for ?status=
//! POST /api/orders/display     - Badges and tabs for a batch of orders
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Server-rendered pages and form actions. The mount-time guard wraps these.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/register", get(pages::register))
        .route("/forgot-password", get(pages::forgot_password))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session/expire", post(auth::expire_session))
        .route("/dashboard", get(dashboard::index))
}

/// JSON API, nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session/events", post(api::session::events))
        .route("/orders/status", get(api::orders::status))
        .route("/orders/display", post(api::orders::display_orders))
}
