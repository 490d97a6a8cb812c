//! Session store for the two bearer tokens issued after passcode verification.
//! Presence of both tokens is the only notion of "signed in": there is no
//! expiry metadata and no refresh exchange. Tokens are held as secrets in memory
//! and must never be logged.

use super::{errors::AppError, storage::KeyValueStorage};
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, sync::Arc};
use tracing::debug;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Access and refresh tokens returned by the backend. `Debug` output is redacted.
#[derive(Clone, Debug)]
pub struct Session {
    access_token: SecretString,
    refresh_token: SecretString,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }

    #[must_use]
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    #[must_use]
    pub fn refresh_token(&self) -> &SecretString {
        &self.refresh_token
    }
}

/// Handle to the persisted session, shared by the clients and route guards.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionStore")
            .field("present", &self.is_present())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(super::storage::MemoryStorage::new()))
    }

    /// Persists both tokens.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if either write is rejected; a partially
    /// written session is removed again.
    pub fn save(&self, session: &Session) -> Result<(), AppError> {
        self.storage
            .set(ACCESS_TOKEN_KEY, session.access_token.expose_secret())?;
        if let Err(err) = self
            .storage
            .set(REFRESH_TOKEN_KEY, session.refresh_token.expose_secret())
        {
            let _ = self.storage.remove(ACCESS_TOKEN_KEY);
            return Err(err);
        }
        debug!("session stored");
        Ok(())
    }

    /// Returns the session when both tokens are present and non-empty.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let access = non_empty(self.storage.get(ACCESS_TOKEN_KEY))?;
        let refresh = non_empty(self.storage.get(REFRESH_TOKEN_KEY))?;
        Some(Session::new(access, refresh))
    }

    /// Access token for the `Authorization` header, if one is stored.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        non_empty(self.storage.get(ACCESS_TOKEN_KEY)).map(SecretString::from)
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.load().is_some()
    }

    /// Removes both tokens, e.g. on logout or when the backend rejects them.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the backend rejects a removal.
    pub fn clear(&self) -> Result<(), AppError> {
        let access = self.storage.remove(ACCESS_TOKEN_KEY);
        let refresh = self.storage.remove(REFRESH_TOKEN_KEY);
        debug!("session cleared");
        access.and(refresh)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, Session, SessionStore};
    use crate::app_lib::{
        errors::AppError,
        storage::{KeyValueStorage, MemoryStorage},
    };
    use secrecy::ExposeSecret;
    use std::sync::Arc;

    #[test]
    fn save_then_load_returns_both_tokens() {
        let store = SessionStore::in_memory();
        store.save(&Session::new("A", "B")).unwrap();

        let session = store.load().unwrap();
        assert_eq!(session.access_token().expose_secret(), "A");
        assert_eq!(session.refresh_token().expose_secret(), "B");
        assert!(store.is_present());
    }

    #[test]
    fn missing_or_empty_token_means_no_session() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(Arc::new(storage.clone()));

        storage.set(ACCESS_TOKEN_KEY, "A").unwrap();
        assert!(store.load().is_none());

        storage.set(REFRESH_TOKEN_KEY, "  ").unwrap();
        assert!(store.load().is_none());
        assert!(store.access_token().is_some());
    }

    #[test]
    fn clear_removes_the_session() {
        let store = SessionStore::in_memory();
        store.save(&Session::new("A", "B")).unwrap();

        store.clear().unwrap();
        assert!(store.load().is_none());
        assert!(store.access_token().is_none());
    }

    #[test]
    fn debug_output_never_contains_tokens() {
        let session = Session::new("super-secret-access", "super-secret-refresh");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("super-secret"));
    }

    struct RejectingRefresh(MemoryStorage);

    impl KeyValueStorage for RejectingRefresh {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
            if key == REFRESH_TOKEN_KEY {
                return Err(AppError::Storage("quota exceeded".to_string()));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), AppError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn failed_save_leaves_no_partial_session() {
        let inner = MemoryStorage::new();
        let store = SessionStore::new(Arc::new(RejectingRefresh(inner.clone())));

        let result = store.save(&Session::new("A", "B"));
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(inner.get(ACCESS_TOKEN_KEY), None);
    }
}
