//! Session event API.
//!
//! The session guard script reports back/forward navigations and the tab
//! becoming visible. Each report runs the matching watcher against this
//! request's logout flags and answers whether the page must leave.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use sellah_core::session::{
    GuardKind, GuardState, NavigationWatcher, RecordingNavigator, Visibility, VisibilityWatcher,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::Result;
use crate::session::{flush_flag_store, load_flag_store};
use crate::state::AppState;

/// Event reported by the session guard script.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// `popstate` or a `pageshow` restored from the back/forward cache.
    Navigation { path: String },
    /// `visibilitychange`.
    Visibility {
        path: String,
        visibility: Visibility,
    },
}

impl SessionEvent {
    #[must_use]
    pub const fn guard(&self) -> GuardKind {
        match self {
            Self::Navigation { .. } => GuardKind::Navigation,
            Self::Visibility { .. } => GuardKind::Visibility,
        }
    }
}

/// Watcher verdict for one event.
#[derive(Debug, Serialize)]
pub struct SessionEventResponse {
    pub guard: GuardKind,
    pub state: GuardState,
    /// Where the page must navigate, if anywhere.
    pub redirect: Option<String>,
}

/// Run the watcher for a reported event.
///
/// POST /api/session/events
///
/// # Errors
///
/// Returns an error if cleared flags cannot be written back to the session.
pub async fn events(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(event): Json<SessionEvent>,
) -> Result<Response> {
    let mut store = load_flag_store(&headers, &session, state.cookie_policy()).await;
    let mut navigator = RecordingNavigator::new();

    let guard_state = match &event {
        SessionEvent::Navigation { path } => {
            NavigationWatcher::subscribe().on_navigation(path, &mut store, &mut navigator)
        }
        SessionEvent::Visibility { path, visibility } => VisibilityWatcher::subscribe()
            .on_visibility_change(*visibility, path, &mut store, &mut navigator),
    };

    let redirect = navigator.last_redirect().map(str::to_string);

    let mut response = Json(SessionEventResponse {
        guard: event.guard(),
        state: guard_state,
        redirect,
    })
    .into_response();
    flush_flag_store(store, &session, &mut response).await?;

    Ok(response)
}
