//! REST API client module for the school-management backend.
//!
//! `ApiClient` knows the endpoints and their response envelopes; the
//! `Transport` underneath moves requests over HTTP. Every request carries
//! `Authorization: Bearer <token>` once a session is active.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ApiClient, LoginResponse, LoginUser};
pub use error::ApiError;
pub use transport::{ApiRequest, HttpTransport, Method, MultipartUpload, RequestBody, Transport};
