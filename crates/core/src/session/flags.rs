//! Logout flag store.
//!
//! A logout is recorded twice: once in a cookie the server can read before
//! any page code runs, and once in client flag storage the guards read. The
//! store writes and clears both together.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::storage::{FlagStorage, StorageError};

/// Name of the server-readable logout cookie.
pub const LOGOUT_COOKIE_NAME: &str = "auth_logged_out";

/// Value the logout cookie carries while set.
pub const LOGOUT_COOKIE_VALUE: &str = "true";

/// Client flag storage keys.
pub mod keys {
    /// Set to `"true"` after an explicit or forced logout.
    pub const LOGGED_OUT: &str = "auth_logged_out";

    /// Free-form reason recorded with the logout.
    pub const LOGOUT_REASON: &str = "auth_logout_reason";

    /// Set to `"true"` when the logout was forced by session expiry.
    pub const SESSION_EXPIRED: &str = "auth_session_expired";
}

/// Client flag keys a mark writes or removes.
const CLIENT_KEYS: [&str; 3] = [keys::LOGGED_OUT, keys::LOGOUT_REASON, keys::SESSION_EXPIRED];

/// Reason recorded by [`LogoutFlagStore::mark_session_expired`].
pub const SESSION_EXPIRED_REASON: &str = "session_expired";

/// Errors from flag store mutations.
#[derive(Debug, Error)]
pub enum FlagError {
    /// Recording a logout failed; nothing was left half-written.
    #[error("failed to record logout: {0}")]
    Write(#[source] StorageError),

    /// Clearing the flags failed.
    #[error("failed to clear logout flags: {0}")]
    Clear(#[source] StorageError),
}

/// Point-in-time view of the logout flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutFlag {
    pub logged_out: bool,
    pub reason: Option<String>,
    pub session_expired: bool,
}

/// Reads and writes the logout flag pair.
///
/// `C` is the cookie side, `L` the client flag side.
#[derive(Debug)]
pub struct LogoutFlagStore<C, L> {
    cookies: C,
    local: L,
}

impl<C: FlagStorage, L: FlagStorage> LogoutFlagStore<C, L> {
    pub const fn new(cookies: C, local: L) -> Self {
        Self { cookies, local }
    }

    /// Record an explicit logout.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Write`] if either storage rejects the write. The
    /// flags are then restored to the values they had before the call, so a
    /// logout recorded earlier survives.
    pub fn mark_logged_out(&mut self, reason: &str) -> Result<(), FlagError> {
        self.mark(reason, false)
    }

    /// Record a logout forced by session expiry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::mark_logged_out`].
    pub fn mark_session_expired(&mut self) -> Result<(), FlagError> {
        self.mark(SESSION_EXPIRED_REASON, true)
    }

    /// Whether a logout is recorded on either side.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage read fails.
    pub fn was_logged_out(&self) -> Result<bool, StorageError> {
        Ok(is_true(self.local.read(keys::LOGGED_OUT)?.as_deref())
            || is_true(self.cookies.read(LOGOUT_COOKIE_NAME)?.as_deref()))
    }

    /// Whether the recorded logout was forced by session expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the client flag cannot be read.
    pub fn was_session_expired(&self) -> Result<bool, StorageError> {
        Ok(is_true(self.local.read(keys::SESSION_EXPIRED)?.as_deref()))
    }

    /// The reason recorded with the logout, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the client flag cannot be read.
    pub fn logout_reason(&self) -> Result<Option<String>, StorageError> {
        self.local.read(keys::LOGOUT_REASON)
    }

    /// Read all flags at once.
    ///
    /// # Errors
    ///
    /// Returns an error if any storage read fails.
    pub fn snapshot(&self) -> Result<LogoutFlag, StorageError> {
        Ok(LogoutFlag {
            logged_out: self.was_logged_out()?,
            reason: self.logout_reason()?,
            session_expired: self.was_session_expired()?,
        })
    }

    /// Remove the cookie and the client flags. Clearing already-clear flags
    /// succeeds without doing anything observable.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Clear`] if either storage rejects a delete.
    pub fn clear(&mut self) -> Result<(), FlagError> {
        self.remove_all().map_err(FlagError::Clear)
    }

    /// Cookie-side storage.
    pub const fn cookies(&self) -> &C {
        &self.cookies
    }

    /// Client-side storage.
    pub const fn local(&self) -> &L {
        &self.local
    }

    /// Give back both storages, e.g. to flush pending changes.
    pub fn into_parts(self) -> (C, L) {
        (self.cookies, self.local)
    }

    fn mark(&mut self, reason: &str, session_expired: bool) -> Result<(), FlagError> {
        let prior = self.read_prior().map_err(FlagError::Write)?;
        let result = self.write_all(reason, session_expired);

        if let Err(err) = &result {
            tracing::error!(
                error = %err,
                reason,
                "failed to record logout, restoring previous flags"
            );
            if let Err(restore) = self.restore(&prior) {
                tracing::error!(error = %restore, "restoring logout flags failed");
            }
        }

        result.map_err(FlagError::Write)
    }

    fn read_prior(&self) -> Result<PriorFlags, StorageError> {
        let [logged_out, reason, session_expired] = CLIENT_KEYS;
        Ok(PriorFlags {
            cookie: self.cookies.read(LOGOUT_COOKIE_NAME)?,
            client: [
                self.local.read(logged_out)?,
                self.local.read(reason)?,
                self.local.read(session_expired)?,
            ],
        })
    }

    /// Put every key back, reporting the first failure after trying them all.
    fn restore(&mut self, prior: &PriorFlags) -> Result<(), StorageError> {
        let mut first_error = restore_key(
            &mut self.cookies,
            LOGOUT_COOKIE_NAME,
            prior.cookie.as_deref(),
        )
        .err();
        for (key, value) in CLIENT_KEYS.into_iter().zip(&prior.client) {
            if let Err(err) = restore_key(&mut self.local, key, value.as_deref()) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn write_all(&mut self, reason: &str, session_expired: bool) -> Result<(), StorageError> {
        self.cookies.write(LOGOUT_COOKIE_NAME, LOGOUT_COOKIE_VALUE)?;
        self.local.write(keys::LOGGED_OUT, "true")?;
        self.local.write(keys::LOGOUT_REASON, reason)?;
        if session_expired {
            self.local.write(keys::SESSION_EXPIRED, "true")
        } else {
            self.local.remove(keys::SESSION_EXPIRED)
        }
    }

    fn remove_all(&mut self) -> Result<(), StorageError> {
        self.cookies.remove(LOGOUT_COOKIE_NAME)?;
        self.local.remove(keys::LOGGED_OUT)?;
        self.local.remove(keys::LOGOUT_REASON)?;
        self.local.remove(keys::SESSION_EXPIRED)
    }
}

/// Flag values read before a mark, indexed like [`CLIENT_KEYS`].
struct PriorFlags {
    cookie: Option<String>,
    client: [Option<String>; 3],
}

fn restore_key<S: FlagStorage>(
    storage: &mut S,
    key: &str,
    value: Option<&str>,
) -> Result<(), StorageError> {
    match value {
        Some(value) => storage.write(key, value),
        None => storage.remove(key),
    }
}

fn is_true(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    /// Storage that accepts reads but rejects writes to one key.
    #[derive(Debug, Default)]
    struct RejectingStorage {
        inner: MemoryStorage,
        reject_key: &'static str,
    }

    impl FlagStorage for RejectingStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.reject_key {
                return Err(StorageError::Rejected {
                    key: key.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
            self.inner.write(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn store() -> LogoutFlagStore<MemoryStorage, MemoryStorage> {
        LogoutFlagStore::new(MemoryStorage::new(), MemoryStorage::new())
    }

    #[test]
    fn test_mark_logged_out_sets_both_sides() {
        let mut store = store();
        store.mark_logged_out("explicit").unwrap();

        assert!(store.was_logged_out().unwrap());
        assert!(!store.was_session_expired().unwrap());
        assert_eq!(store.logout_reason().unwrap().as_deref(), Some("explicit"));
        assert_eq!(
            store.cookies().read(LOGOUT_COOKIE_NAME).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            store.local().read(keys::LOGGED_OUT).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_clear_resets_both_sides() {
        let mut store = store();
        store.mark_logged_out("explicit").unwrap();
        store.clear().unwrap();

        assert!(!store.was_logged_out().unwrap());
        assert_eq!(store.logout_reason().unwrap(), None);
        assert_eq!(store.cookies().read(LOGOUT_COOKIE_NAME).unwrap(), None);
        assert!(store.local().is_empty().unwrap());
    }

    #[test]
    fn test_clear_twice_is_noop() {
        let mut store = store();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.snapshot().unwrap(), LogoutFlag::default());

        store.mark_logged_out("explicit").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.snapshot().unwrap(), LogoutFlag::default());
    }

    #[test]
    fn test_mark_session_expired() {
        let mut store = store();
        store.mark_session_expired().unwrap();

        assert_eq!(
            store.snapshot().unwrap(),
            LogoutFlag {
                logged_out: true,
                reason: Some(SESSION_EXPIRED_REASON.to_string()),
                session_expired: true,
            }
        );
    }

    #[test]
    fn test_explicit_logout_after_expiry_drops_expired_flag() {
        let mut store = store();
        store.mark_session_expired().unwrap();
        store.mark_logged_out("explicit").unwrap();
        assert!(!store.was_session_expired().unwrap());
    }

    #[test]
    fn test_cookie_alone_counts_as_logged_out() {
        let mut cookies = MemoryStorage::new();
        cookies.write(LOGOUT_COOKIE_NAME, "true").unwrap();
        let store = LogoutFlagStore::new(cookies, MemoryStorage::new());
        assert!(store.was_logged_out().unwrap());
    }

    #[test]
    fn test_failed_client_write_rolls_back_cookie() {
        let local = RejectingStorage {
            reject_key: keys::LOGOUT_REASON,
            ..RejectingStorage::default()
        };
        let mut store = LogoutFlagStore::new(MemoryStorage::new(), local);

        let err = store.mark_logged_out("explicit").unwrap_err();
        assert!(matches!(
            err,
            FlagError::Write(StorageError::Rejected { .. })
        ));

        assert!(!store.was_logged_out().unwrap());
        assert_eq!(store.cookies().read(LOGOUT_COOKIE_NAME).unwrap(), None);
    }

    #[test]
    fn test_failed_mark_keeps_earlier_logout() {
        let mut cookies = MemoryStorage::new();
        cookies.write(LOGOUT_COOKIE_NAME, "true").unwrap();
        let mut local = RejectingStorage {
            reject_key: keys::LOGOUT_REASON,
            ..RejectingStorage::default()
        };
        local.inner.write(keys::LOGGED_OUT, "true").unwrap();
        local.inner.write(keys::SESSION_EXPIRED, "true").unwrap();
        let mut store = LogoutFlagStore::new(cookies, local);

        assert!(store.mark_logged_out("explicit").is_err());

        assert_eq!(
            store.snapshot().unwrap(),
            LogoutFlag {
                logged_out: true,
                reason: None,
                session_expired: true,
            }
        );
        assert_eq!(
            store.cookies().read(LOGOUT_COOKIE_NAME).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_failed_mark_restores_previous_reason() {
        let cookies = RejectingStorage {
            reject_key: LOGOUT_COOKIE_NAME,
            ..RejectingStorage::default()
        };
        let mut local = MemoryStorage::new();
        local.write(keys::LOGGED_OUT, "true").unwrap();
        local.write(keys::LOGOUT_REASON, "user_logout").unwrap();
        let mut store = LogoutFlagStore::new(cookies, local);

        assert!(store.mark_session_expired().is_err());

        assert!(store.was_logged_out().unwrap());
        assert!(!store.was_session_expired().unwrap());
        assert_eq!(
            store.logout_reason().unwrap().as_deref(),
            Some("user_logout")
        );
    }

    #[test]
    fn test_failed_cookie_write_leaves_client_untouched() {
        let cookies = RejectingStorage {
            reject_key: LOGOUT_COOKIE_NAME,
            ..RejectingStorage::default()
        };
        let mut store = LogoutFlagStore::new(cookies, MemoryStorage::new());

        assert!(store.mark_session_expired().is_err());
        assert!(store.local().is_empty().unwrap());
    }

    #[test]
    fn test_borrowed_storages() {
        let mut cookies = MemoryStorage::new();
        let mut local = MemoryStorage::new();
        {
            let mut store = LogoutFlagStore::new(&mut cookies, &mut local);
            store.mark_logged_out("explicit").unwrap();
        }
        assert_eq!(
            local.read(keys::LOGOUT_REASON).unwrap().as_deref(),
            Some("explicit")
        );
    }
}
