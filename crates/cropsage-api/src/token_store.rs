//! Client-local persistence of the single admin session token.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::AdminToken;

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// File-backed store holding at most one admin token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved token, or `None` when nothing has been saved.
    ///
    /// An unreadable or corrupt file is treated as "no token" and logged.
    ///
    /// # Errors
    ///
    /// [`ApiError::TokenStore`] on I/O failures other than a missing file.
    pub fn load(&self) -> Result<Option<AdminToken>, ApiError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        match serde_json::from_str::<StoredToken>(&raw) {
            Ok(stored) if !stored.token.is_empty() => {
                tracing::debug!(saved_at = %stored.saved_at, "loaded admin token");
                Ok(Some(AdminToken::new(stored.token)))
            }
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt token file");
                Ok(None)
            }
        }
    }

    /// Saves `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// [`ApiError::TokenStore`] if the file cannot be written.
    pub fn save(&self, token: &AdminToken) -> Result<(), ApiError> {
        let stored = StoredToken {
            token: token.as_str().to_owned(),
            saved_at: Utc::now(),
        };
        let body = serde_json::to_string(&stored)
            .map_err(|e| self.io_error(std::io::Error::from(e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

        // `mode` only applies on creation; tighten a pre-existing file before
        // the token is written into it.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }
        file.write_all(body.as_bytes())
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Removes the saved token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// [`ApiError::TokenStore`] if an existing file cannot be removed.
    pub fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> ApiError {
        ApiError::TokenStore {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_without_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_returns_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("token"));
        store.save(&AdminToken::new("k3y")).unwrap();
        assert_eq!(store.load().unwrap(), Some(AdminToken::new("k3y")));
    }

    #[test]
    fn save_replaces_previous_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store.save(&AdminToken::new("first")).unwrap();
        store.save(&AdminToken::new("second")).unwrap();
        assert_eq!(store.load().unwrap(), Some(AdminToken::new("second")));
    }

    #[test]
    fn clear_removes_token_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store.save(&AdminToken::new("k3y")).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_treated_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "not json").unwrap();
        assert!(TokenStore::new(path).load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store.save(&AdminToken::new("k3y")).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn save_tightens_existing_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = TokenStore::new(&path);
        store.save(&AdminToken::new("k3y")).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), Some(AdminToken::new("k3y")));
    }
}
