//! Core library for schoolportal.
//!
//! Everything the portal needs apart from the terminal: the session store and
//! authenticator, the role-based route guard, the REST client with its
//! response envelopes, domain models, form validation and view-models.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod models;
pub mod routes;
pub mod utils;
pub mod views;

pub use api::{ApiClient, ApiError, HttpTransport, Transport};
pub use auth::{Authenticator, Credentials, Session, SessionStore, SessionVault};
pub use config::Config;
pub use error::{AuthError, DataFetchError, Resource, SubmitError};
pub use guard::{GuardDecision, Navigator, RouteGuard, ViewDescriptor};
pub use models::Role;
pub use routes::Route;
