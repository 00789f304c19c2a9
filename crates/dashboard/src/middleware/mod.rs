//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, HTTP context)
//! 2. `TraceLayer` (request span)
//! 3. Request ID
//! 4. Security headers (no-store caching)
//! 5. Logout gate (cookie check before any handler)
//! 6. Session layer (tower-sessions, in-memory store)
//! 7. Page guard (mount-time guard, page routes only)

pub mod auth;
pub mod logout_gate;
pub mod page_guard;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalSeller, RequireSeller, SellerAuthRejection, clear_current_seller, set_current_seller,
};
pub use logout_gate::{GateDecision, gate_decision, logout_gate_middleware};
pub use page_guard::{ConsumedLogout, page_guard_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
