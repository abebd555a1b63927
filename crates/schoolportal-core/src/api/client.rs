//! API client for the school-management REST API.
//!
//! Every endpoint wraps its payload in a named envelope field
//! (`{"profile": {...}}`, `{"documents": [...]}`); `extract` unwraps it and
//! treats a missing field as a data error.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::config::Config;
use crate::error::{DataFetchError, Resource, SubmitError};
use crate::forms::{
    DocumentUpload, TcDecision, TcDecisionForm, TransferCertificateApplication,
    TransferCertificateForm,
};
use crate::models::{
    AcademicRecord, SchemeEnrollment, School, StudentDocument, StudentProfile, StudentSummary,
    TransferCertificate,
};

use super::transport::{ApiRequest, HttpTransport, Method, Transport};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint, relative to the API base URL
const LOGIN_PATH: &str = "/auth/login";

/// Body returned by `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: LoginUser,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(deserialize_with = "crate::models::flexible_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// API client for the portal backend.
/// Clone is cheap - the transport shares its connection pool.
#[derive(Clone)]
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    token: Option<String>,
}

impl ApiClient<HttpTransport> {
    /// Build a reqwest-backed client from the configured base URL and timeout
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Create a new ApiClient with the given token, sharing the transport.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            transport: self.transport.clone(),
            token: Some(token),
        }
    }

    fn request(&self, method: Method, path: String) -> ApiRequest {
        ApiRequest::new(method, path).bearer(self.token.as_deref())
    }

    /// Pull `field` out of a response envelope.
    fn extract<R: DeserializeOwned>(mut body: Value, field: &'static str) -> Result<R, ApiError> {
        let value = match body.get_mut(field) {
            Some(value) if !value.is_null() => value.take(),
            _ => return Err(ApiError::MissingField(field)),
        };
        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("`{}`: {}", field, e)))
    }

    async fn get_field<R: DeserializeOwned>(
        &self,
        path: String,
        field: &'static str,
        resource: Resource,
    ) -> Result<R, DataFetchError> {
        let result = async {
            let body = self.transport.execute(self.request(Method::Get, path)).await?;
            Self::extract(body, field)
        }
        .await;

        result.map_err(|e| {
            warn!(resource = ?resource, error = %e, "Fetch failed");
            DataFetchError::new(resource, e)
        })
    }

    async fn send(&self, request: ApiRequest, resource: Resource) -> Result<(), DataFetchError> {
        match self.transport.execute(request).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(resource = ?resource, error = %e, "Request failed");
                Err(DataFetchError::new(resource, e))
            }
        }
    }

    // ===== Authentication =====

    /// Exchange credentials for a user and token. Accepts the body either
    /// bare or nested under `data`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
            "userType": credentials.role.as_str(),
        });
        debug!(username = %credentials.username, role = %credentials.role, "Logging in");

        let request = ApiRequest::new(Method::Post, LOGIN_PATH).json(body);
        let mut response = self.transport.execute(request).await?;

        if response.get("token").is_none() {
            if let Some(data) = response.get_mut("data").filter(|d| d.is_object()) {
                response = data.take();
            }
        }
        if response.get("user").map_or(true, Value::is_null) {
            return Err(ApiError::MissingField("user"));
        }
        if response.get("token").map_or(true, Value::is_null) {
            return Err(ApiError::MissingField("token"));
        }
        serde_json::from_value(response)
            .map_err(|e| ApiError::InvalidResponse(format!("login response: {}", e)))
    }

    // ===== Student endpoints =====

    pub async fn fetch_profile(&self, student_id: &str) -> Result<StudentProfile, DataFetchError> {
        self.get_field(format!("/students/{}", student_id), "profile", Resource::Profile)
            .await
    }

    /// Same endpoint as `fetch_profile`, reported as an admin-side failure
    pub async fn fetch_student_details(
        &self,
        student_id: &str,
    ) -> Result<StudentProfile, DataFetchError> {
        self.get_field(format!("/students/{}", student_id), "profile", Resource::StudentDetails)
            .await
    }

    pub async fn fetch_academic_records(
        &self,
        student_id: &str,
    ) -> Result<Vec<AcademicRecord>, DataFetchError> {
        self.get_field(
            format!("/students/{}/academic-records", student_id),
            "academicRecords",
            Resource::AcademicRecords,
        )
        .await
    }

    pub async fn fetch_documents(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentDocument>, DataFetchError> {
        self.get_field(
            format!("/students/{}/documents", student_id),
            "documents",
            Resource::Documents,
        )
        .await
    }

    pub async fn upload_document(
        &self,
        student_id: &str,
        upload: DocumentUpload,
    ) -> Result<(), DataFetchError> {
        debug!(
            document_type = upload.document_type.label(),
            file = %upload.file_name,
            size_kb = upload.size_kb(),
            "Uploading document"
        );
        let request = self
            .request(Method::Post, format!("/students/{}/documents/upload", student_id))
            .multipart(upload.into_multipart());
        self.send(request, Resource::DocumentUpload).await
    }

    async fn apply_for_transfer_certificate(
        &self,
        student_id: &str,
        application: &TransferCertificateApplication,
    ) -> Result<(), DataFetchError> {
        let body = serde_json::to_value(application).map_err(|e| {
            DataFetchError::new(
                Resource::TransferApplication,
                ApiError::InvalidResponse(e.to_string()),
            )
        })?;
        let request = self
            .request(Method::Post, format!("/students/{}/transfer-certificate", student_id))
            .json(body);
        self.send(request, Resource::TransferApplication).await
    }

    /// Validate the form and submit it. Nothing is sent when validation fails.
    pub async fn submit_transfer_certificate(
        &self,
        student_id: &str,
        form: &TransferCertificateForm,
    ) -> Result<(), SubmitError> {
        let application = form.validate()?;
        self.apply_for_transfer_certificate(student_id, &application)
            .await?;
        Ok(())
    }

    pub async fn fetch_transfer_certificates(
        &self,
        student_id: &str,
    ) -> Result<Vec<TransferCertificate>, DataFetchError> {
        self.get_field(
            format!("/students/{}/transfer-certificate", student_id),
            "transferCertificates",
            Resource::TransferCertificates,
        )
        .await
    }

    pub async fn fetch_schemes(
        &self,
        student_id: &str,
    ) -> Result<Vec<SchemeEnrollment>, DataFetchError> {
        self.get_field(
            format!("/students/{}/schemes", student_id),
            "schemes",
            Resource::Schemes,
        )
        .await
    }

    // ===== Admin endpoints =====

    pub async fn fetch_students(&self) -> Result<Vec<StudentSummary>, DataFetchError> {
        self.get_field("/admin/students".to_string(), "students", Resource::Students)
            .await
    }

    pub async fn fetch_transfer_requests(
        &self,
    ) -> Result<Vec<TransferCertificate>, DataFetchError> {
        self.get_field(
            "/admin/transfer-certificates".to_string(),
            "transferCertificates",
            Resource::TransferRequests,
        )
        .await
    }

    async fn update_transfer_certificate_status(
        &self,
        tc_id: &str,
        decision: &TcDecision,
    ) -> Result<(), DataFetchError> {
        let body = json!({
            "status": decision.status.as_str(),
            "comments": decision.comments,
        });
        let request = self
            .request(Method::Patch, format!("/admin/transfer-certificates/{}", tc_id))
            .json(body);
        self.send(request, Resource::TransferDecision).await
    }

    /// Validate a decision against the request it targets, then send it.
    pub async fn review_transfer_certificate(
        &self,
        target: &TransferCertificate,
        form: &TcDecisionForm,
    ) -> Result<(), SubmitError> {
        let decision = form.validate(target)?;
        self.update_transfer_certificate_status(&target.tc_id, &decision)
            .await?;
        Ok(())
    }

    pub async fn fetch_schools(&self) -> Result<Vec<School>, DataFetchError> {
        self.get_field("/admin/schools".to_string(), "schools", Resource::Schools)
            .await
    }
}
