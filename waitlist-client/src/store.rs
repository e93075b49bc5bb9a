//! Credential persistence
//!
//! The credential is kept under two fixed keys, `admin_token` and
//! `admin_data`. Both keys are always written and removed together.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;
use waitlist_common::auth::AdminIdentity;

pub const TOKEN_KEY: &str = "admin_token";
pub const IDENTITY_KEY: &str = "admin_data";

/// Bearer token paired with the identity it was issued for
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub admin: AdminIdentity,
}

impl Credential {
    pub fn new(token: impl Into<String>, admin: AdminIdentity) -> Self {
        Self {
            token: token.into(),
            admin,
        }
    }

    /// Short, non-reversible hint of the token for status displays
    pub fn token_hint(&self) -> String {
        let prefix: String = self.token.chars().take(8).collect();
        format!("{}...", prefix)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("admin", &self.admin)
            .finish()
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode session file: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("Failed to decode session file: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("Failed to encode identity: {0}")]
    Identity(#[from] serde_json::Error),
    #[error("Credential store lock poisoned")]
    Poisoned,
}

/// Key-value home of the current credential
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, StoreError>;
    fn save(&self, credential: &Credential) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
    /// Remove the credential only while it still carries `token`, as one
    /// step. Returns whether anything was removed.
    fn clear_if_token(&self, token: &str) -> Result<bool, StoreError>;
}

/// Process-local store, used for ephemeral sessions and tests
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        let slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = None;
        Ok(())
    }

    fn clear_if_token(&self, token: &str) -> Result<bool, StoreError> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        match slot.as_ref() {
            Some(current) if current.token == token => {
                *slot = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// On-disk layout; `admin_data` holds the identity as a JSON string
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_data: Option<String>,
}

/// TOML-file store, by default `$HOME/.config/waitlist/session.toml`.
///
/// Operations on one handle are serialized; separate processes sharing the
/// file are not coordinated.
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn default_path() -> Result<PathBuf, StoreError> {
        let home = std::env::var("HOME").map_err(|_| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "HOME is not set",
            ))
        })?;
        Ok(PathBuf::from(home).join(".config/waitlist/session.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file in one rename so readers never see half a credential
    fn write_file(&self, file: &SessionFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(file)?;
        let tmp = self.path.with_extension("toml.tmp");

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut out = options.open(&tmp)?;

        // `mode` only applies on creation; a leftover temp file keeps its own
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            out.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        out.write_all(contents.as_bytes())?;
        out.sync_all()?;
        drop(out);

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn remove_file(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_file(&self) -> Result<Option<Credential>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let file: SessionFile = toml::from_str(&contents)?;

        let Some(token) = file.admin_token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        // A token without a readable identity is not a credential
        let admin = match file.admin_data.as_deref().map(|raw| serde_json::from_str::<AdminIdentity>(raw)) {
            Some(Ok(admin)) => admin,
            Some(Err(e)) => {
                warn!(path = %self.path.display(), error = %e, "ignoring session with unreadable identity");
                return Ok(None);
            }
            None => {
                warn!(path = %self.path.display(), "ignoring session without identity");
                return Ok(None);
            }
        };

        Ok(Some(Credential { token, admin }))
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        let _guard = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        self.read_file()
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        let file = SessionFile {
            admin_token: Some(credential.token.clone()),
            admin_data: Some(serde_json::to_string(&credential.admin)?),
        };
        let _guard = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        self.write_file(&file)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        self.remove_file()
    }

    fn clear_if_token(&self, token: &str) -> Result<bool, StoreError> {
        let _guard = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        match self.read_file()? {
            Some(current) if current.token == token => {
                self.remove_file()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
