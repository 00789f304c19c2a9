//! Request-scoped cookie storage.
//!
//! Reads the cookies a request arrived with and turns writes into
//! `Set-Cookie` headers on the response.

use std::collections::BTreeMap;

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, SET_COOKIE},
};
use sellah_core::{FlagStorage, StorageError};
use tower_sessions::cookie::{Cookie, SameSite};

/// Attributes applied to cookies written by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CookiePolicy {
    /// Add the `Secure` attribute (HTTPS deployments).
    pub secure: bool,
}

impl CookiePolicy {
    fn build(self, name: &str, value: &str) -> Cookie<'static> {
        // Client code reads the logout cookie, so no HttpOnly.
        Cookie::build((name.to_string(), value.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .http_only(false)
            .build()
    }
}

/// Cookie jar for one request.
///
/// Only cookies whose value changed during the request produce headers, so
/// clearing an absent cookie adds nothing to the response.
#[derive(Debug, Clone, Default)]
pub struct CookieStorage {
    original: BTreeMap<String, String>,
    current: BTreeMap<String, String>,
    policy: CookiePolicy,
}

impl CookieStorage {
    /// Parse every `Cookie` header of a request. Malformed pairs are skipped.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, policy: CookiePolicy) -> Self {
        let original: BTreeMap<String, String> = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();

        Self {
            current: original.clone(),
            original,
            policy,
        }
    }

    /// Whether any cookie changed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.original != self.current
    }

    /// `Set-Cookie` values for every changed cookie.
    #[must_use]
    pub fn set_cookie_headers(&self) -> Vec<String> {
        let updated = self
            .current
            .iter()
            .filter(|(name, value)| self.original.get(*name) != Some(*value))
            .map(|(name, value)| self.policy.build(name, value));

        let removed = self
            .original
            .keys()
            .filter(|name| !self.current.contains_key(*name))
            .map(|name| {
                let mut cookie = self.policy.build(name, "");
                cookie.make_removal();
                cookie
            });

        updated
            .chain(removed)
            .map(|cookie| cookie.to_string())
            .collect()
    }

    /// Drop a cookie from the jar. A removal header is emitted only if the
    /// request carried it.
    pub fn delete(&mut self, name: &str) {
        self.current.remove(name);
    }

    /// Append the changes to a response's headers.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for value in self.set_cookie_headers() {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(err) => tracing::error!(error = %err, "unencodable Set-Cookie header dropped"),
            }
        }
    }
}

impl FlagStorage for CookieStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.current.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.current.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.delete(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sellah_core::LOGOUT_COOKIE_NAME;

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_parses_request_cookies() {
        let jar = CookieStorage::from_headers(
            &headers("sellah_session=abc; auth_logged_out=true"),
            CookiePolicy::default(),
        );
        assert_eq!(
            jar.read(LOGOUT_COOKIE_NAME).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(jar.read("sellah_session").unwrap().as_deref(), Some("abc"));
        assert!(!jar.has_changes());
    }

    #[test]
    fn test_write_emits_set_cookie() {
        let mut jar = CookieStorage::from_headers(&HeaderMap::new(), CookiePolicy { secure: true });
        jar.write(LOGOUT_COOKIE_NAME, "true").unwrap();

        let headers = jar.set_cookie_headers();
        assert_eq!(headers.len(), 1);
        let header = &headers[0];
        assert!(header.starts_with("auth_logged_out=true"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Secure"));
        assert!(!header.contains("HttpOnly"));
    }

    #[test]
    fn test_remove_emits_expired_cookie() {
        let mut jar =
            CookieStorage::from_headers(&headers("auth_logged_out=true"), CookiePolicy::default());
        jar.remove(LOGOUT_COOKIE_NAME).unwrap();

        let headers = jar.set_cookie_headers();
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("auth_logged_out="));
        assert!(headers[0].contains("Max-Age=0"));
    }

    #[test]
    fn test_removing_absent_cookie_emits_nothing() {
        let mut jar = CookieStorage::from_headers(&headers("other=1"), CookiePolicy::default());
        jar.remove(LOGOUT_COOKIE_NAME).unwrap();
        jar.remove(LOGOUT_COOKIE_NAME).unwrap();
        assert!(jar.set_cookie_headers().is_empty());

        let mut response_headers = HeaderMap::new();
        jar.apply(&mut response_headers);
        assert!(response_headers.get(SET_COOKIE).is_none());
    }

    #[test]
    fn test_delete_matches_flag_removal() {
        let mut jar =
            CookieStorage::from_headers(&headers("auth_logged_out=true"), CookiePolicy::default());
        jar.delete(LOGOUT_COOKIE_NAME);

        assert_eq!(jar.read(LOGOUT_COOKIE_NAME).unwrap(), None);
        assert!(jar.has_changes());
        assert!(jar.set_cookie_headers()[0].contains("Max-Age=0"));
    }

    #[test]
    fn test_rewriting_same_value_emits_nothing() {
        let mut jar =
            CookieStorage::from_headers(&headers("auth_logged_out=true"), CookiePolicy::default());
        jar.write(LOGOUT_COOKIE_NAME, "true").unwrap();
        assert!(!jar.has_changes());
    }
}
