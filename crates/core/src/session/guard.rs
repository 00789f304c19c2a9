//! Session guards.
//!
//! Three independent watchers keep a logged-out session from showing
//! protected content:
//!
//! - [`NavigationWatcher`] - back/forward navigation
//! - [`VisibilityWatcher`] - the tab becoming visible again
//! - [`MountGuard`] - a protected page about to render
//!
//! All three run the same check: on a public path the logout flags are
//! cleared; on a protected path a recorded logout sends the user to
//! [`SESSION_EXPIRED_REDIRECT`]. A storage read failure counts as "not logged
//! out" and is logged.
//!
//! Once a watcher has redirected it stays in [`GuardState::Redirecting`] and
//! ignores further events; the redirect supersedes them.

use serde::{Deserialize, Serialize};

use super::flags::LogoutFlagStore;
use super::storage::FlagStorage;
use crate::routes::{RouteAccess, SESSION_EXPIRED_REDIRECT};

/// State of one watcher instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    Idle,
    Checking,
    Redirecting,
}

/// Which watcher performed a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    Navigation,
    Visibility,
    Mount,
}

impl GuardKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::Visibility => "visibility",
            Self::Mount => "mount",
        }
    }
}

/// Page visibility reported by a visibility-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Router collaborator that performs the actual redirect.
pub trait Navigator {
    fn redirect(&mut self, target: &str);
}

/// Navigator that only remembers where it was sent.
///
/// The dashboard turns the recorded target into an HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    redirects: Vec<String>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every redirect issued, oldest first.
    #[must_use]
    pub fn redirects(&self) -> &[String] {
        &self.redirects
    }

    /// The most recent redirect target.
    #[must_use]
    pub fn last_redirect(&self) -> Option<&str> {
        self.redirects.last().map(String::as_str)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&mut self, target: &str) {
        self.redirects.push(target.to_string());
    }
}

/// Result of the check shared by all guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Public path; flags were cleared.
    PublicCleared,
    /// Protected path and no logout recorded.
    Allowed,
    /// Protected path with a recorded logout.
    Redirect,
}

/// Classify `path` and consult the logout flags.
pub fn check_route<C, L>(
    store: &mut LogoutFlagStore<C, L>,
    path: &str,
    kind: GuardKind,
) -> CheckOutcome
where
    C: FlagStorage,
    L: FlagStorage,
{
    match RouteAccess::classify(path) {
        RouteAccess::Public => {
            if let Err(err) = store.clear() {
                tracing::warn!(
                    guard = kind.as_str(),
                    path,
                    error = %err,
                    "could not clear logout flags"
                );
            }
            CheckOutcome::PublicCleared
        }
        RouteAccess::Protected => match store.was_logged_out() {
            Ok(true) => CheckOutcome::Redirect,
            Ok(false) => CheckOutcome::Allowed,
            Err(err) => {
                tracing::warn!(
                    guard = kind.as_str(),
                    path,
                    error = %err,
                    "logout flag unreadable, treating session as live"
                );
                CheckOutcome::Allowed
            }
        },
    }
}

fn check_and_redirect<C, L, N>(
    store: &mut LogoutFlagStore<C, L>,
    navigator: &mut N,
    path: &str,
    kind: GuardKind,
) -> GuardState
where
    C: FlagStorage,
    L: FlagStorage,
    N: Navigator + ?Sized,
{
    match check_route(store, path, kind) {
        CheckOutcome::Redirect => {
            tracing::info!(
                guard = kind.as_str(),
                path,
                target = SESSION_EXPIRED_REDIRECT,
                "stale session on protected route, redirecting"
            );
            navigator.redirect(SESSION_EXPIRED_REDIRECT);
            GuardState::Redirecting
        }
        CheckOutcome::Allowed | CheckOutcome::PublicCleared => GuardState::Idle,
    }
}

/// Watches back/forward navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationWatcher {
    state: GuardState,
    subscribed: bool,
}

impl NavigationWatcher {
    /// Start watching.
    #[must_use]
    pub const fn subscribe() -> Self {
        Self {
            state: GuardState::Idle,
            subscribed: true,
        }
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Handle a back/forward navigation that landed on `path`.
    pub fn on_navigation<C, L, N>(
        &mut self,
        path: &str,
        store: &mut LogoutFlagStore<C, L>,
        navigator: &mut N,
    ) -> GuardState
    where
        C: FlagStorage,
        L: FlagStorage,
        N: Navigator + ?Sized,
    {
        if !self.subscribed || self.state == GuardState::Redirecting {
            return self.state;
        }
        self.state = GuardState::Checking;
        self.state = check_and_redirect(store, navigator, path, GuardKind::Navigation);
        self.state
    }

    /// Stop watching; later events are ignored.
    pub const fn teardown(&mut self) {
        self.subscribed = false;
    }
}

/// Watches the page becoming visible again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityWatcher {
    state: GuardState,
    subscribed: bool,
}

impl VisibilityWatcher {
    /// Start watching.
    #[must_use]
    pub const fn subscribe() -> Self {
        Self {
            state: GuardState::Idle,
            subscribed: true,
        }
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Handle a visibility change while `path` is shown.
    ///
    /// Becoming hidden never triggers a check.
    pub fn on_visibility_change<C, L, N>(
        &mut self,
        visibility: Visibility,
        path: &str,
        store: &mut LogoutFlagStore<C, L>,
        navigator: &mut N,
    ) -> GuardState
    where
        C: FlagStorage,
        L: FlagStorage,
        N: Navigator + ?Sized,
    {
        if !self.subscribed
            || self.state == GuardState::Redirecting
            || visibility == Visibility::Hidden
        {
            return self.state;
        }
        self.state = GuardState::Checking;
        self.state = check_and_redirect(store, navigator, path, GuardKind::Visibility);
        self.state
    }

    /// Stop watching; later events are ignored.
    pub const fn teardown(&mut self) {
        self.subscribed = false;
    }
}

/// What a page should do after the mount-time check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// Render the page.
    Render,
    /// Render nothing; a redirect was issued.
    RenderNothing,
}

/// Gates the first render of a page.
///
/// Starts in [`GuardState::Checking`] and renders nothing until
/// [`MountGuard::mount`] has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountGuard {
    state: GuardState,
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl MountGuard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GuardState::Checking,
        }
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    /// Whether children may be rendered right now.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.state == GuardState::Idle
    }

    /// Run the check for a page mounting at `path`.
    pub fn mount<C, L, N>(
        &mut self,
        path: &str,
        store: &mut LogoutFlagStore<C, L>,
        navigator: &mut N,
    ) -> MountOutcome
    where
        C: FlagStorage,
        L: FlagStorage,
        N: Navigator + ?Sized,
    {
        if self.state == GuardState::Redirecting {
            return MountOutcome::RenderNothing;
        }
        self.state = check_and_redirect(store, navigator, path, GuardKind::Mount);
        if self.should_render() {
            MountOutcome::Render
        } else {
            MountOutcome::RenderNothing
        }
    }
}
