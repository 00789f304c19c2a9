//! Key-value persistence boundary for logout flags.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

/// Errors raised by a [`FlagStorage`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backend cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused a single write or delete.
    #[error("storage rejected {key}: {reason}")]
    Rejected {
        /// Key being written or removed.
        key: String,
        /// Backend-specific explanation.
        reason: String,
    },
}

/// Synchronous string key-value storage.
///
/// Implemented by request cookies, the server session snapshot and
/// [`MemoryStorage`]. Removing a missing key is not an error.
pub trait FlagStorage {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: FlagStorage + ?Sized> FlagStorage for &mut T {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory storage behind a shared handle.
///
/// Clones see the same entries, which is how two stores model two browser
/// tabs sharing one origin's storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Whether no keys are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl FlagStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let mut tab_a = MemoryStorage::new();
        let tab_b = tab_a.clone();

        tab_a.write("k", "v").unwrap();
        assert_eq!(tab_b.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(tab_b.len().unwrap(), 1);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let mut storage = MemoryStorage::new();
        storage.remove("absent").unwrap();
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_lock_reports_unavailable() {
        let storage = MemoryStorage::new();
        let poisoner = storage.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            storage.read("k"),
            Err(StorageError::Unavailable(_))
        ));
    }
}
