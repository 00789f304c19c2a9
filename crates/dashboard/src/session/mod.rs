//! Logout flag storage for HTTP requests.
//!
//! - [`cookies`] - the logout cookie, read from the request and written back
//!   as `Set-Cookie` headers
//! - [`client_flags`] - the client flags, kept in the server session
//!
//! [`RequestFlagStore`] pairs the two so handlers and middleware drive the
//! same `LogoutFlagStore` the guards are written against.

pub mod client_flags;
pub mod cookies;

use axum::http::HeaderMap;
use axum::response::Response;
use sellah_core::LogoutFlagStore;
use tower_sessions::Session;

pub use client_flags::SessionFlagStorage;
pub use cookies::{CookiePolicy, CookieStorage};

/// Logout flags for one request.
pub type RequestFlagStore = LogoutFlagStore<CookieStorage, SessionFlagStorage>;

/// Build the flag store for a request.
pub async fn load_flag_store(
    headers: &HeaderMap,
    session: &Session,
    policy: CookiePolicy,
) -> RequestFlagStore {
    LogoutFlagStore::new(
        CookieStorage::from_headers(headers, policy),
        SessionFlagStorage::load(session).await,
    )
}

/// Flush a store: session flags go to the session, cookie changes onto
/// `response`.
///
/// # Errors
///
/// Returns an error if the session store rejects the update. Cookie changes
/// are applied either way.
pub async fn flush_flag_store(
    store: RequestFlagStore,
    session: &Session,
    response: &mut Response,
) -> Result<(), tower_sessions::session::Error> {
    let (cookies, local) = store.into_parts();
    cookies.apply(response.headers_mut());
    local.persist(session).await
}
