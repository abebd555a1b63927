//! Authentication and session management.
//!
//! This module provides:
//! - `SessionStore`: the single active `Session`, persisted across restarts
//! - `Authenticator`: exchanges `Credentials` for a session
//! - `SessionVault`: optional encryption of the persisted session record
//! - `CredentialStore`: remembered passwords in the OS keychain

pub mod authenticator;
pub mod credentials;
pub mod session;
pub mod vault;

pub use authenticator::{Authenticator, Credentials};
pub use credentials::CredentialStore;
pub use session::{InvalidSession, Session, SessionStore};
pub use vault::SessionVault;
