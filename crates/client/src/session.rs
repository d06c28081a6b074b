//! Persisted session state.
//!
//! The token and the logged-in user survive restarts in a JSON file,
//! the client-side equivalent of surviving a page reload.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use ceycan_core::{Role, UserId};

use crate::error::ApiClientError;

/// An opaque bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The user identity attached to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// What gets persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: SessionToken,
    pub user: SessionUser,
}

/// File-backed session persistence.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted session, if one exists.
    ///
    /// A missing file is simply "not logged in"; a corrupt file is
    /// treated the same way and cleared on the next save.
    #[must_use]
    pub fn load(&self) -> Option<StoredSession> {
        let bytes = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("discarding unreadable session file: {e}");
                None
            }
        }
    }

    /// Persist a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::SessionStore` if the file cannot be
    /// written.
    pub fn save(&self, session: &StoredSession) -> Result<(), ApiClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(session)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }

    /// Remove the persisted session (logout).
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::SessionStore` if the file exists but
    /// cannot be removed.
    pub fn clear(&self) -> Result<(), ApiClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> SessionStore {
        let path = std::env::temp_dir().join(format!("ceycan-session-{}.json", uuid::Uuid::new_v4()));
        SessionStore::new(path)
    }

    fn sample_session() -> StoredSession {
        StoredSession {
            token: SessionToken::new("abc.def.ghi"),
            user: SessionUser {
                id: UserId::new(1),
                name: "Admin User".to_owned(),
                email: "admin@ceycanagro.com".to_owned(),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn test_load_missing_file_is_logged_out() {
        let store = temp_store();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let store = temp_store();
        store.save(&sample_session()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, SessionToken::new("abc.def.ghi"));
        assert_eq!(loaded.user.name, "Admin User");

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = temp_store();
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let store = temp_store();
        std::fs::write(
            store.path.clone(),
            b"{not json",
        )
        .unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }
}
