//! Bearer credential storage and the session context
//!
//! A [`Session`] is created once by the application's composition root and
//! handed to the [`ApiClient`](crate::client::ApiClient). It reads the token
//! from a [`CredentialStore`] on every request; the token is written on login
//! and removed on logout.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::StoreError;

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

/// Persistent key-value storage for credentials.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store; forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: DashMap<String, String>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk, surviving restarts.
///
/// Writes go to a private temporary file in the same directory which then
/// replaces the old file, so readers never see a half-written store. On
/// Unix the file is created with mode `0600`.
///
/// A file that is not valid JSON reads as empty: the stored token is lost,
/// but the next login overwrites the file instead of failing on it.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Use the file at `path`, which need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Use `<config_dir>/qliq/credentials.json`.
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Default location of the credential file.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(dir.join("qliq").join("credentials.json"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "credential file is corrupt, treating it as empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&serde_json::to_vec_pretty(entries)?)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        change(&mut entries);
        self.save(&entries)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Explicit authentication context shared by every request.
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    /// Wrap a credential store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Session over a fresh [`MemoryCredentialStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    /// The current bearer token. An empty stored token counts as none.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    /// Whether a token is currently stored.
    pub fn is_authenticated(&self) -> Result<bool, StoreError> {
        Ok(self.token()?.is_some())
    }

    /// Store the token returned by a successful login.
    pub fn establish(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)
    }

    /// Forget the token.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = MemoryCredentialStore::new();
        assert!(store.remove("nothing").is_ok());
    }

    #[test]
    fn test_session_ignores_empty_token() {
        let session = Session::in_memory();
        session.establish("").unwrap();
        assert_eq!(session.token().unwrap(), None);
        assert!(!session.is_authenticated().unwrap());
    }

    #[test]
    fn test_session_establish_and_clear() {
        let session = Session::in_memory();
        session.establish("abc").unwrap();
        assert_eq!(session.token().unwrap().as_deref(), Some("abc"));
        session.clear().unwrap();
        assert_eq!(session.token().unwrap(), None);
    }
}
