//! Authentication extractors for the seller dashboard.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use sellah_core::LOGIN_PATH;
use tower_sessions::Session;

use crate::models::{CurrentSeller, session_keys};

/// Extractor that requires a signed-in seller.
///
/// Page requests without a seller are redirected to the login page, API
/// requests get 401 Unauthorized.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSeller(seller): RequireSeller,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", seller.email)
/// }
/// ```
pub struct RequireSeller(pub CurrentSeller);

/// Rejection returned by [`RequireSeller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for SellerAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSeller
where
    S: Send + Sync,
{
    type Rejection = SellerAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(SellerAuthRejection::Unauthorized)?;

        let seller: CurrentSeller = session
            .get(session_keys::CURRENT_SELLER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| rejection_for(parts))?;

        Ok(Self(seller))
    }
}

/// Nested routers see the path with their prefix stripped, so the API check
/// runs against the URI the request arrived with.
fn rejection_for(parts: &Parts) -> SellerAuthRejection {
    let path = parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |OriginalUri(uri)| uri.path());

    if path == "/api" || path.starts_with("/api/") {
        SellerAuthRejection::Unauthorized
    } else {
        SellerAuthRejection::RedirectToLogin
    }
}

/// Extractor that optionally gets the signed-in seller.
pub struct OptionalSeller(pub Option<CurrentSeller>);

impl<S> FromRequestParts<S> for OptionalSeller
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let seller = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentSeller>(session_keys::CURRENT_SELLER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(seller))
    }
}

/// Store the signed-in seller in the session.
///
/// The session ID is cycled first so a pre-login session cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_seller(
    session: &Session,
    seller: &CurrentSeller,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_SELLER, seller).await
}

/// Remove the signed-in seller from the session (logout).
///
/// Other session data, including the logout flags, is kept.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_seller(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentSeller>(session_keys::CURRENT_SELLER)
        .await?;
    session.cycle_id().await
}
