//! Sign-in, logout and session-expiry handlers.
//!
//! Logout and expiry record the logout flags before the seller is removed
//! from the session. A fresh sign-in clears them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use sellah_core::{LOGIN_PATH, LogoutFlag, SESSION_EXPIRED_REDIRECT};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{ConsumedLogout, clear_current_seller, set_current_seller};
use crate::models::CurrentSeller;
use crate::services::{AuthError, SellerAuthenticator};
use crate::session::{RequestFlagStore, flush_flag_store, load_flag_store};
use crate::state::AppState;

/// Where a signed-in seller lands.
const DASHBOARD_PATH: &str = "/dashboard";

/// Reason recorded by the logout button.
const DEFAULT_LOGOUT_REASON: &str = "user_logout";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Logout form data.
#[derive(Debug, Default, Deserialize)]
pub struct LogoutForm {
    pub reason: Option<String>,
}

/// Query parameters of the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// `expired` after a guard or gate redirect.
    pub session: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Banner shown above the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginBanner {
    SessionExpired,
    LoggedOut(String),
}

impl LoginBanner {
    /// Pick the banner for a login page visit.
    ///
    /// `session=expired` wins; otherwise a consumed logout shows its reason.
    #[must_use]
    pub fn select(query: &LoginQuery, consumed: Option<&LogoutFlag>) -> Option<Self> {
        if query.session.as_deref() == Some("expired")
            || consumed.is_some_and(|flag| flag.session_expired)
        {
            return Some(Self::SessionExpired);
        }

        consumed
            .and_then(|flag| flag.reason.as_deref())
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .map(|reason| Self::LoggedOut(reason.to_string()))
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::SessionExpired => "Your session has expired. Please sign in again.".to_string(),
            Self::LoggedOut(reason) => format!("You have been logged out: {reason}"),
        }
    }

    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::SessionExpired => "banner banner-expired",
            Self::LoggedOut(_) => "banner banner-logged-out",
        }
    }
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub banner: Option<LoginBanner>,
    pub error: Option<String>,
}

fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_string(),
        "session" => "Could not start a session. Please try again.".to_string(),
        _ => "Sign-in failed.".to_string(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    Query(query): Query<LoginQuery>,
    consumed: Option<Extension<ConsumedLogout>>,
) -> impl IntoResponse {
    let consumed = consumed.map(|Extension(ConsumedLogout(flag))| flag);

    LoginTemplate {
        banner: LoginBanner::select(&query, consumed.as_ref()),
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let authenticator = SellerAuthenticator::new(&state.config().seller);
    let email = match authenticator.verify(&form.email, &form.password) {
        Ok(email) => email,
        Err(AuthError::PasswordHash) => {
            tracing::error!("password verification failed");
            return Redirect::to("/login?error=failed").into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            return Redirect::to("/login?error=credentials").into_response();
        }
    };

    let seller = CurrentSeller::signed_in_now(email);
    if let Err(e) = set_current_seller(&session, &seller).await {
        tracing::error!(error = %e, "failed to set session");
        return Redirect::to("/login?error=session").into_response();
    }

    set_sentry_user(seller.email.as_str());
    tracing::info!(seller = %seller.email, "seller signed in");

    let mut response = Redirect::to(DASHBOARD_PATH).into_response();
    if let Err(e) = clear_logout_flags(&state, &session, &headers, &mut response).await {
        tracing::warn!(error = %e, "could not clear logout flags after sign-in");
    }
    response
}

async fn clear_logout_flags(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    response: &mut Response,
) -> Result<()> {
    let mut store = load_flag_store(headers, session, state.cookie_policy()).await;
    store.clear()?;
    flush_flag_store(store, session, response).await?;
    Ok(())
}

// =============================================================================
// Logout Routes
// =============================================================================

/// Explicit logout.
///
/// Records the logout flags, then removes the seller from the session. The
/// redirect lands on the login page, which shows the reason.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<LogoutForm>,
) -> Result<Response> {
    let reason = form
        .reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| DEFAULT_LOGOUT_REASON.to_string());

    let mut store = load_flag_store(&headers, &session, state.cookie_policy()).await;
    store.mark_logged_out(&reason)?;

    end_session(&session, store, LOGIN_PATH).await
}

/// Forced logout after inactivity.
///
/// Entry point for the client-side inactivity timer.
pub async fn expire_session(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let mut store = load_flag_store(&headers, &session, state.cookie_policy()).await;
    store.mark_session_expired()?;

    end_session(&session, store, SESSION_EXPIRED_REDIRECT).await
}

async fn end_session(
    session: &Session,
    store: RequestFlagStore,
    redirect: &str,
) -> Result<Response> {
    clear_current_seller(session).await?;
    clear_sentry_user();

    let mut response = Redirect::to(redirect).into_response();
    flush_flag_store(store, session, &mut response).await?;

    tracing::info!(redirect, "seller signed out");
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(session: Option<&str>) -> LoginQuery {
        LoginQuery {
            session: session.map(str::to_string),
            error: None,
        }
    }

    fn consumed(reason: &str, session_expired: bool) -> LogoutFlag {
        LogoutFlag {
            logged_out: true,
            reason: Some(reason.to_string()),
            session_expired,
        }
    }

    #[test]
    fn test_session_expired_query_wins() {
        let flag = consumed("user_logout", false);
        assert_eq!(
            LoginBanner::select(&query(Some("expired")), Some(&flag)),
            Some(LoginBanner::SessionExpired)
        );
    }

    #[test]
    fn test_reason_banner() {
        let flag = consumed("password changed", false);
        let banner = LoginBanner::select(&query(None), Some(&flag)).unwrap();
        assert_eq!(
            banner.message(),
            "You have been logged out: password changed"
        );
    }

    #[test]
    fn test_expired_flag_without_query() {
        let flag = consumed("session_expired", true);
        assert_eq!(
            LoginBanner::select(&query(None), Some(&flag)),
            Some(LoginBanner::SessionExpired)
        );
    }

    #[test]
    fn test_no_banner_on_plain_visit() {
        assert_eq!(LoginBanner::select(&query(None), None), None);
        assert_eq!(LoginBanner::select(&query(Some("other")), None), None);
        assert_eq!(
            LoginBanner::select(&query(None), Some(&consumed("  ", false))),
            None
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(error_message("credentials"), "Invalid email or password.");
        assert_eq!(error_message("nope"), "Sign-in failed.");
    }
}
