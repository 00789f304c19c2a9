//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::session::CookiePolicy;

/// Application state shared across all handlers.
///
/// This is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Attributes for cookies the dashboard writes.
    #[must_use]
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy {
            secure: self.inner.config.is_secure(),
        }
    }
}
