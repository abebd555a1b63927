//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, request timeout, and the last login (username and role)
//! used to pre-fill the login screen.
//!
//! Configuration is stored at `~/.config/schoolportal/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Role;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "schoolportal";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// HTTP request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment overrides
pub const ENV_API_URL: &str = "SCHOOLPORTAL_API_URL";
pub const ENV_USERNAME: &str = "SCHOOLPORTAL_USERNAME";
pub const ENV_PASSWORD: &str = "SCHOOLPORTAL_PASSWORD";
pub const ENV_ROLE: &str = "SCHOOLPORTAL_ROLE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub last_username: Option<String>,
    pub last_role: Option<Role>,
    /// Offer to keep the password in the OS keychain after a successful login
    pub remember_password: bool,
    /// File values replaced by environment overrides, restored on save
    #[serde(skip)]
    shadowed: Shadowed,
}

#[derive(Debug, Clone, Default)]
struct Shadowed {
    api_base_url: Option<String>,
    last_username: Option<Option<String>>,
    last_role: Option<Option<Role>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            last_username: None,
            last_role: None,
            remember_password: false,
            shadowed: Shadowed::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.persisted())?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply environment overrides. Takes a lookup so tests don't touch the
    /// process environment. Overrides only last for this run; `save` writes
    /// back the values they replaced.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            debug!(url = %url, "API base URL overridden from environment");
            let previous = std::mem::replace(&mut self.api_base_url, url.trim().to_string());
            if self.shadowed.api_base_url.is_none() {
                self.shadowed.api_base_url = Some(previous);
            }
        }
        if let Some(username) = lookup(ENV_USERNAME).filter(|u| !u.trim().is_empty()) {
            let previous = self.last_username.replace(username.trim().to_string());
            if self.shadowed.last_username.is_none() {
                self.shadowed.last_username = Some(previous);
            }
        }
        if let Some(role) = lookup(ENV_ROLE).as_deref().and_then(Role::parse) {
            let previous = self.last_role.replace(role);
            if self.shadowed.last_role.is_none() {
                self.shadowed.last_role = Some(previous);
            }
        }
    }

    /// The config as it should be written to disk
    fn persisted(&self) -> Config {
        let mut on_disk = self.clone();
        let shadowed = std::mem::take(&mut on_disk.shadowed);
        if let Some(url) = shadowed.api_base_url {
            on_disk.api_base_url = url;
        }
        if let Some(username) = shadowed.last_username {
            on_disk.last_username = username;
        }
        if let Some(role) = shadowed.last_role {
            on_disk.last_role = role;
        }
        on_disk
    }

    /// Password supplied through the environment, if any
    pub fn env_password() -> Option<String> {
        std::env::var(ENV_PASSWORD).ok().filter(|p| !p.is_empty())
    }

    /// Remember the last successful login
    pub fn remember_login(&mut self, username: &str, role: Role) {
        self.last_username = Some(username.to_string());
        self.last_role = Some(role);
        self.shadowed.last_username = None;
        self.shadowed.last_role = None;
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the session record and log files
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join("logs"))
    }
}
