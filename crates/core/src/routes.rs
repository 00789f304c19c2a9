//! The public/protected route partition.
//!
//! The edge gate and all three session guards classify paths through
//! [`RouteAccess::classify`], which reads [`PUBLIC_ROUTES`]. There is no
//! other list of public paths in the workspace.

use serde::Serialize;

/// Paths reachable without a live session.
///
/// `/` matches only the home page itself. Every other entry also covers its
/// sub-paths (`/login/...`), but not longer names that merely share a prefix
/// (`/loginx`).
pub const PUBLIC_ROUTES: &[&str] = &["/", "/login", "/register", "/forgot-password", "/about"];

/// Login page path.
pub const LOGIN_PATH: &str = "/login";

/// Where guards and the gate send a stale session.
pub const SESSION_EXPIRED_REDIRECT: &str = "/login?session=expired";

/// Access class of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAccess {
    Public,
    Protected,
}

impl RouteAccess {
    /// Classify a request path. Query strings and fragments are ignored.
    ///
    /// ```
    /// use sellah_core::RouteAccess;
    ///
    /// assert_eq!(RouteAccess::classify("/about/team"), RouteAccess::Public);
    /// assert_eq!(RouteAccess::classify("/dashboard/products"), RouteAccess::Protected);
    /// ```
    #[must_use]
    pub fn classify(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = if path.is_empty() { "/" } else { path };

        if PUBLIC_ROUTES
            .iter()
            .any(|route| matches_public_route(route, path))
        {
            Self::Public
        } else {
            Self::Protected
        }
    }

    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
        }
    }
}

fn matches_public_route(route: &str, path: &str) -> bool {
    if route == "/" {
        return path == "/";
    }
    path.strip_prefix(route)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
