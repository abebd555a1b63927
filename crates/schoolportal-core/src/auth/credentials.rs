use anyhow::{Context, Result};
use keyring::Entry;

use crate::models::Role;

pub(crate) const SERVICE_NAME: &str = "schoolportal";

/// Remembered passwords in the OS keychain, one entry per role and username.
pub struct CredentialStore;

impl CredentialStore {
    fn entry(username: &str, role: Role) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &Self::account(username, role)).context("Failed to create keyring entry")
    }

    fn account(username: &str, role: Role) -> String {
        format!("{}:{}", role.as_str(), username)
    }

    /// Store password in the OS keychain
    pub fn store(username: &str, role: Role, password: &str) -> Result<()> {
        Self::entry(username, role)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// Retrieve password for a username from the OS keychain
    pub fn get_password(username: &str, role: Role) -> Result<String> {
        Self::entry(username, role)?
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Delete stored credentials, ignoring a missing entry
    pub fn delete(username: &str, role: Role) -> Result<()> {
        match Self::entry(username, role)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}
