//! Client flag storage backed by the server session.
//!
//! The dashboard keeps the "local" half of the logout flags in the seller's
//! server session, so they outlive a single page and survive navigation
//! between tabs sharing the session cookie.

use std::collections::BTreeMap;

use sellah_core::{FlagStorage, StorageError};
use tower_sessions::Session;

use crate::models::session_keys;

/// Snapshot of the session's logout flags for one request.
///
/// Writes stay in memory until [`SessionFlagStorage::persist`] is called.
#[derive(Debug, Clone)]
pub struct SessionFlagStorage {
    flags: Result<BTreeMap<String, String>, StorageError>,
    dirty: bool,
}

impl SessionFlagStorage {
    /// Load the flags from `session`.
    ///
    /// A session that cannot be read yields storage whose every operation
    /// fails with [`StorageError::Unavailable`]; guards treat that as "not
    /// logged out".
    pub async fn load(session: &Session) -> Self {
        let flags = match session
            .get::<BTreeMap<String, String>>(session_keys::LOGOUT_FLAGS)
            .await
        {
            Ok(flags) => Ok(flags.unwrap_or_default()),
            Err(err) => {
                tracing::warn!(error = %err, "session flags unreadable");
                Err(StorageError::Unavailable(err.to_string()))
            }
        };

        Self {
            flags,
            dirty: false,
        }
    }

    /// Empty storage not tied to a session.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            flags: Ok(BTreeMap::new()),
            dirty: false,
        }
    }

    /// Whether a write or remove changed anything since loading.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write pending changes back to `session`.
    ///
    /// Clean storage is a no-op, and an empty flag set removes the session
    /// key instead of storing an empty map.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the update.
    pub async fn persist(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        if !self.dirty {
            return Ok(());
        }

        match &self.flags {
            Ok(flags) if flags.is_empty() => {
                session.remove_value(session_keys::LOGOUT_FLAGS).await?;
            }
            Ok(flags) => session.insert(session_keys::LOGOUT_FLAGS, flags).await?,
            Err(_) => {}
        }

        Ok(())
    }

    fn flags_mut(&mut self) -> Result<&mut BTreeMap<String, String>, StorageError> {
        self.flags.as_mut().map_err(|err| err.clone())
    }
}

impl FlagStorage for SessionFlagStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.flags {
            Ok(flags) => Ok(flags.get(key).cloned()),
            Err(err) => Err(err.clone()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.flags_mut()?.insert(key.to_string(), value.to_string());
        self.dirty |= previous.as_deref() != Some(value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let previous = self.flags_mut()?.remove(key);
        self.dirty |= previous.is_some();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use sellah_core::session::keys;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_load_empty_session() {
        let storage = SessionFlagStorage::load(&session()).await;
        assert_eq!(storage.read(keys::LOGGED_OUT).unwrap(), None);
        assert!(!storage.is_dirty());
    }

    #[tokio::test]
    async fn test_persist_round_trips_through_session() {
        let session = session();

        let mut storage = SessionFlagStorage::load(&session).await;
        storage.write(keys::LOGGED_OUT, "true").unwrap();
        storage.write(keys::LOGOUT_REASON, "user_logout").unwrap();
        assert!(storage.is_dirty());
        storage.persist(&session).await.unwrap();

        let reloaded = SessionFlagStorage::load(&session).await;
        assert_eq!(
            reloaded.read(keys::LOGGED_OUT).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            reloaded.read(keys::LOGOUT_REASON).unwrap().as_deref(),
            Some("user_logout")
        );
    }

    #[tokio::test]
    async fn test_clearing_all_flags_removes_session_key() {
        let session = session();
        session
            .insert(
                session_keys::LOGOUT_FLAGS,
                BTreeMap::from([(keys::LOGGED_OUT.to_string(), "true".to_string())]),
            )
            .await
            .unwrap();

        let mut storage = SessionFlagStorage::load(&session).await;
        storage.remove(keys::LOGGED_OUT).unwrap();
        storage.persist(&session).await.unwrap();

        let raw: Option<BTreeMap<String, String>> =
            session.get(session_keys::LOGOUT_FLAGS).await.unwrap();
        assert!(raw.is_none());
    }

    #[test]
    fn test_removing_missing_key_stays_clean() {
        let mut storage = SessionFlagStorage::empty();
        storage.remove(keys::LOGGED_OUT).unwrap();
        assert!(!storage.is_dirty());
    }

    #[test]
    fn test_unavailable_storage_rejects_everything() {
        let mut storage = SessionFlagStorage {
            flags: Err(StorageError::Unavailable("store down".to_string())),
            dirty: false,
        };
        assert!(storage.read(keys::LOGGED_OUT).is_err());
        assert!(storage.write(keys::LOGGED_OUT, "true").is_err());
        assert!(storage.remove(keys::LOGGED_OUT).is_err());
    }
}
