//! Mount-time session guard for server-rendered pages.
//!
//! Runs the `MountGuard` before a page handler renders. On a protected page
//! with a recorded logout the handler never runs; on a public page the flags
//! are cleared first and the values they held are handed to the handler as
//! [`ConsumedLogout`] so the login page can still show why the seller was
//! signed out.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sellah_core::{
    LogoutFlag, RouteAccess, SESSION_EXPIRED_REDIRECT,
    session::{MountGuard, MountOutcome, RecordingNavigator},
};
use tower_sessions::Session;

use crate::session::{CookiePolicy, load_flag_store};

/// Logout flags a public page cleared on entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumedLogout(pub LogoutFlag);

/// Page middleware running the mount-time guard.
pub async fn page_guard_middleware(
    State(policy): State<CookiePolicy>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let mut store = load_flag_store(request.headers(), &session, policy).await;

    // Read before the guard clears anything.
    let before = store.snapshot().unwrap_or_default();

    let mut guard = MountGuard::new();
    let mut navigator = RecordingNavigator::new();
    let outcome = guard.mount(&path, &mut store, &mut navigator);

    let (cookies, local) = store.into_parts();
    if let Err(err) = local.persist(&session).await {
        tracing::warn!(path, error = %err, "could not persist logout flags");
    }

    let mut response = match outcome {
        MountOutcome::RenderNothing => {
            let target = navigator
                .last_redirect()
                .unwrap_or(SESSION_EXPIRED_REDIRECT);
            Redirect::to(target).into_response()
        }
        MountOutcome::Render => {
            if RouteAccess::classify(&path).is_public() && before.logged_out {
                request.extensions_mut().insert(ConsumedLogout(before));
            }
            next.run(request).await
        }
    };

    cookies.apply(response.headers_mut());
    response
}
