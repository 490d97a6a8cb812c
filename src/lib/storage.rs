//! Persistent key-value storage used for the session tokens. The browser
//! implementation wraps `window.localStorage`, scoped to the page origin; the
//! in-memory implementation backs tests and browsers where local storage is
//! disabled. Values are stored as-is; nothing here encrypts or expires them.

use super::errors::AppError;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::warn;

/// Minimal string key-value store.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns `AppError::Storage` when the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// # Errors
    /// Returns `AppError::Storage` when the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// Process-local storage that forgets everything on reload.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// `window.localStorage`, looked up on every call so the handle stays `Send`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, AppError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok())
            .flatten()
            .ok_or_else(|| AppError::Storage("Local storage is unavailable.".to_string()))
    }

    /// True when the browser exposes local storage for this origin.
    #[must_use]
    pub fn is_available() -> bool {
        Self::storage().is_ok()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| AppError::Storage(format!("Failed to write {key}.")))
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| AppError::Storage(format!("Failed to remove {key}.")))
    }
}

/// Picks the persistent browser storage when available, falling back to memory.
#[must_use]
pub fn default_storage() -> Arc<dyn KeyValueStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        if BrowserStorage::is_available() {
            return Arc::new(BrowserStorage);
        }
    }

    warn!("persistent storage unavailable; session will not survive a reload");
    Arc::new(MemoryStorage::new())
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStorage, MemoryStorage};

    #[test]
    fn memory_storage_round_trips_and_removes() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("access_token"), None);

        storage.set("access_token", "abc").unwrap();
        assert_eq!(storage.get("access_token"), Some("abc".to_string()));

        storage.remove("access_token").unwrap();
        assert_eq!(storage.get("access_token"), None);
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("refresh_token", "xyz").unwrap();
        assert_eq!(other.get("refresh_token"), Some("xyz".to_string()));
    }
}
