//! Session store: the logged-in identity and its durable copy

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::core::credentials::CredentialVerifier;
use crate::core::identity::RecordId;
use crate::core::policy::Role;

/// Storage key the identity is kept under
pub const SESSION_KEY: &str = "aerocode_user";

/// An authenticated user, as persisted between runs
///
/// Never carries the secret used to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(with = "id_text")]
    pub id: RecordId,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub phone: String,
    pub address: String,
}

/// Stored ids are strings (`"1"`); bare numbers are still read
mod id_text {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::core::identity::RecordId;

    pub fn serialize<S: Serializer>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RecordId, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(D::Error::custom),
            Raw::Number(n) => Ok(RecordId::new(n)),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error("not logged in")]
    #[diagnostic(
        code(aerocode::session::logged_out),
        help("run `aerocode login` first (demo accounts: admin, engineer, operator)")
    )]
    NotLoggedIn,

    #[error("failed to access session storage at {path}")]
    #[diagnostic(code(aerocode::session::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode identity")]
    #[diagnostic(code(aerocode::session::encode))]
    Encode(#[from] serde_json::Error),
}

/// Durable key/value storage for the session
pub trait SessionStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "read session storage");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SessionError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir).map_err(|source| SessionError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| SessionError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote session storage");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "erased session storage");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io { path, source }),
        }
    }
}

/// Process-local storage, for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.values.remove(key);
        Ok(())
    }
}

/// The current login, backed by durable storage
///
/// `open` restores a stored identity once; afterwards the in-memory copy is
/// authoritative and every change is written through.
#[derive(Debug)]
pub struct Session<S> {
    storage: S,
    current: Option<Identity>,
    delay: Duration,
}

impl<S: SessionStorage> Session<S> {
    /// Restore the session from `storage`
    ///
    /// A stored identity that no longer parses counts as logged out.
    pub fn open(storage: S) -> Result<Self, SessionError> {
        let current = match storage.read(SESSION_KEY)? {
            Some(raw) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => {
                    tracing::debug!(username = %identity.username, "restored session");
                    Some(identity)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring unreadable stored identity");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            storage,
            current,
            delay: Duration::ZERO,
        })
    }

    /// Wait this long before a login attempt resolves
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// The current identity, or an error telling the user to log in
    pub fn require(&self) -> Result<&Identity, SessionError> {
        self.current.as_ref().ok_or(SessionError::NotLoggedIn)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Attempt a login; `Ok(false)` means the credentials did not match
    ///
    /// A failed attempt leaves any existing session untouched.
    pub fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        secret: &str,
    ) -> Result<bool, SessionError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let Some(identity) = verifier.verify(username, secret) else {
            tracing::info!(username, "login rejected");
            return Ok(false);
        };

        let encoded = serde_json::to_string(&identity)?;
        self.storage.write(SESSION_KEY, &encoded)?;
        tracing::info!(username, role = %identity.role, "logged in");
        self.current = Some(identity);
        Ok(true)
    }

    /// Clear the identity and erase its stored copy
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.storage.remove(SESSION_KEY)?;
        if let Some(identity) = self.current.take() {
            tracing::info!(username = %identity.username, "logged out");
        }
        Ok(())
    }
}
