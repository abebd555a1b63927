use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Role;

use super::SessionVault;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Encrypted session file name, used when a vault is attached
const SEALED_SESSION_FILE: &str = "session.sealed";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidSession {
    #[error("session has an empty auth token")]
    EmptyToken,

    #[error("session has an empty user id")]
    EmptyUserId,
}

/// The authenticated identity. Never holds an empty token.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub username: String,
    pub role: Role,
    pub auth_token: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        username: impl Into<String>,
        role: Role,
        auth_token: impl Into<String>,
    ) -> Result<Self, InvalidSession> {
        let session = Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            username: username.into(),
            role,
            auth_token: auth_token.into(),
            signed_in_at: Utc::now(),
        };
        session.check()?;
        Ok(session)
    }

    /// Re-check the invariants on a session that came from disk.
    pub fn check(&self) -> Result<(), InvalidSession> {
        if self.auth_token.trim().is_empty() {
            return Err(InvalidSession::EmptyToken);
        }
        if self.user_id.trim().is_empty() {
            return Err(InvalidSession::EmptyUserId);
        }
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("auth_token", &"<redacted>")
            .field("signed_in_at", &self.signed_in_at)
            .finish()
    }
}

/// Holds the single active session and its durable copy.
pub struct SessionStore {
    dir: PathBuf,
    vault: Option<SessionVault>,
    active: Option<Session>,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            vault: None,
            active: None,
        }
    }

    /// Encrypt the durable record with `vault`.
    pub fn with_vault(mut self, vault: SessionVault) -> Self {
        self.vault = Some(vault);
        self
    }

    /// Load the persisted session. Anything missing, unreadable or invalid
    /// leaves the store anonymous.
    pub fn restore(&mut self) -> Option<&Session> {
        self.active = match self.read_record() {
            Ok(Some(session)) => match session.check() {
                Ok(()) => {
                    info!(user = %session.username, role = %session.role, "Restored session");
                    Some(session)
                }
                Err(e) => {
                    warn!(error = %e, "Discarding persisted session");
                    None
                }
            },
            Ok(None) => {
                debug!("No persisted session");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to restore session");
                None
            }
        };
        self.active.as_ref()
    }

    /// Replace the active session and persist it. The in-memory session is
    /// replaced even when writing the record fails.
    pub fn set(&mut self, session: Session) -> Result<()> {
        self.active = Some(session);
        self.write_record()
    }

    /// Drop the active session and delete every persisted copy.
    pub fn clear(&mut self) -> Result<()> {
        self.active = None;
        for name in [SESSION_FILE, SEALED_SESSION_FILE] {
            let path = self.dir.join(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }

    pub fn current(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.auth_token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.active.as_ref().map(|s| s.role)
    }

    fn record_path(&self) -> PathBuf {
        match self.vault {
            Some(_) => self.dir.join(SEALED_SESSION_FILE),
            None => self.dir.join(SESSION_FILE),
        }
    }

    fn read_record(&self) -> Result<Option<Session>> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path).context("Failed to read session file")?;
        let plain = match self.vault {
            Some(ref vault) => vault.open(&bytes)?,
            None => bytes,
        };
        let session = serde_json::from_slice(&plain).context("Failed to parse session file")?;
        Ok(Some(session))
    }

    fn write_record(&self) -> Result<()> {
        let Some(ref session) = self.active else {
            return Ok(());
        };
        std::fs::create_dir_all(&self.dir).context("Failed to create session directory")?;
        let plain = serde_json::to_vec_pretty(session)?;
        let bytes = match self.vault {
            Some(ref vault) => vault.seal(&plain)?,
            None => plain,
        };
        std::fs::write(self.record_path(), bytes).context("Failed to write session file")?;

        // A plaintext record left over from an unencrypted run must not outlive a sealed write
        if self.vault.is_some() {
            let plain_path = self.dir.join(SESSION_FILE);
            if plain_path.exists() {
                std::fs::remove_file(&plain_path)
                    .with_context(|| format!("Failed to remove {}", plain_path.display()))?;
            }
        }
        Ok(())
    }
}
