//! User-facing error taxonomy.
//!
//! - `AuthError`: login failed, for whatever reason
//! - `DataFetchError`: a role-scoped fetch or mutation failed
//! - `SubmitError`: a form submission was blocked by validation or failed
//!
//! Each carries a fixed message for inline display; the underlying `ApiError`
//! stays available through `source()` for logging.

use thiserror::Error;

use crate::api::ApiError;
use crate::forms::ValidationErrors;

/// Message shown for every login failure. Wrong password and server trouble
/// are deliberately indistinguishable to the end user.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("credentials rejected: {0}")]
    Rejected(#[source] ApiError),

    #[error("login endpoint unavailable: {0}")]
    Unavailable(#[source] ApiError),

    #[error("malformed login response: {0}")]
    MalformedResponse(String),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        LOGIN_FAILED_MESSAGE
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MissingField(field) => {
                AuthError::MalformedResponse(format!("missing `{}`", field))
            }
            ApiError::InvalidResponse(msg) => AuthError::MalformedResponse(msg),
            e if e.is_rejection() => AuthError::Rejected(e),
            e => AuthError::Unavailable(e),
        }
    }
}

/// Which role-scoped resource an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Profile,
    AcademicRecords,
    Documents,
    DocumentUpload,
    TransferCertificates,
    TransferApplication,
    Schemes,
    Students,
    StudentDetails,
    TransferRequests,
    TransferDecision,
    Schools,
}

impl Resource {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Resource::Profile => "Failed to load profile data. Please try again later.",
            Resource::AcademicRecords => "Failed to load academic records. Please try again later.",
            Resource::Documents => "Failed to load document list. Please try again later.",
            Resource::DocumentUpload => "Failed to upload document. Please try again.",
            Resource::TransferCertificates => {
                "Failed to load transfer certificate status. Please try again later."
            }
            Resource::TransferApplication => "Failed to submit application. Please try again.",
            Resource::Schemes => "Failed to load scheme history. Please try again later.",
            Resource::Students => "Failed to load students. Please try again later.",
            Resource::StudentDetails => "Failed to load student details. Please try again later.",
            Resource::TransferRequests => {
                "Failed to load transfer certificate requests. Please try again later."
            }
            Resource::TransferDecision => "Failed to update transfer certificate. Please try again.",
            Resource::Schools => "Failed to load schools. Please try again later.",
        }
    }
}

#[derive(Error, Debug)]
#[error("{}", .resource.failure_message())]
pub struct DataFetchError {
    pub resource: Resource,
    #[source]
    pub source: ApiError,
}

impl DataFetchError {
    pub fn new(resource: Resource, source: ApiError) -> Self {
        Self { resource, source }
    }

    pub fn user_message(&self) -> &'static str {
        self.resource.failure_message()
    }

    /// The token was refused; the caller should drop the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.source, ApiError::Unauthorized)
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Failed(#[from] DataFetchError),
}

impl SubmitError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SubmitError::Failed(e) if e.is_unauthorized())
    }
}

impl From<ValidationErrors> for SubmitError {
    fn from(errors: ValidationErrors) -> Self {
        SubmitError::Invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_auth_error_classification() {
        assert!(matches!(AuthError::from(ApiError::Unauthorized), AuthError::Rejected(_)));
        assert!(matches!(
            AuthError::from(ApiError::ServerError("boom".into())),
            AuthError::Unavailable(_)
        ));
        assert!(matches!(
            AuthError::from(ApiError::MissingField("token")),
            AuthError::MalformedResponse(_)
        ));
    }

    #[test]
    fn test_auth_error_message_is_generic() {
        let rejected = AuthError::from(ApiError::Unauthorized);
        let down = AuthError::from(ApiError::ServerError("boom".into()));
        assert_eq!(rejected.user_message(), down.user_message());
        assert_eq!(rejected.user_message(), "Invalid username or password");
    }

    #[test]
    fn test_data_fetch_error_display_and_source() {
        let err = DataFetchError::new(Resource::Profile, ApiError::Unauthorized);
        assert_eq!(err.to_string(), "Failed to load profile data. Please try again later.");
        assert!(err.source().is_some());
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_submit_error_unauthorized() {
        let expired: SubmitError =
            DataFetchError::new(Resource::TransferApplication, ApiError::Unauthorized).into();
        assert!(expired.is_unauthorized());

        let invalid: SubmitError = ValidationErrors::new().into();
        assert!(!invalid.is_unauthorized());
    }
}
