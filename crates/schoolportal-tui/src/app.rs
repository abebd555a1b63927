//! Application state management for the portal TUI.
//!
//! `App` owns the session store, the API client and the navigator, plus the
//! per-view data and form state. Fetches run on spawned tasks and report back
//! through an MPSC channel tagged with the `FetchTicket` of the view that
//! started them; results for a view the user has already left are dropped.

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use schoolportal_core::auth::CredentialStore;
use schoolportal_core::forms::{
    DocumentUploadForm, LoginForm, TcDecisionForm, TransferCertificateForm, ValidationErrors,
};
use schoolportal_core::models::{
    AcademicRecord, Role, SchemeEnrollment, School, StudentDocument, StudentProfile,
    StudentSummary, TcStatus, TransferCertificate,
};
use schoolportal_core::views::{
    load_admin_summary, AdminSummary, ApprovalQueue, FetchTicket, Loadable, StudentFilter,
};
use schoolportal_core::{
    ApiClient, Authenticator, Config, Credentials, DataFetchError, HttpTransport, Navigator, Route,
    Session, SessionStore, SessionVault, SubmitError, Transport, ViewDescriptor,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for free-text form fields and prompts.
const MAX_TEXT_LENGTH: usize = 500;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    /// Typing into the focused text field of a form
    Editing,
    /// Typing a path into the go-to prompt
    GoTo,
    Searching,
    Reviewing,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Role,
    Remember,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Role,
            LoginFocus::Role => LoginFocus::Remember,
            LoginFocus::Remember => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Role => LoginFocus::Password,
            LoginFocus::Remember => LoginFocus::Role,
            LoginFocus::Button => LoginFocus::Remember,
        }
    }
}

/// Transfer certificate form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcField {
    Reason,
    DestinationSchool,
    TransferDate,
    AdditionalInfo,
    ParentConsent,
    Submit,
}

impl TcField {
    pub const ALL: [TcField; 6] = [
        TcField::Reason,
        TcField::DestinationSchool,
        TcField::TransferDate,
        TcField::AdditionalInfo,
        TcField::ParentConsent,
        TcField::Submit,
    ];

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_text(&self) -> bool {
        !matches!(self, TcField::ParentConsent | TcField::Submit)
    }
}

/// Document upload form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    DocumentType,
    FilePath,
    Submit,
}

impl UploadField {
    pub fn next(&self) -> Self {
        match self {
            UploadField::DocumentType => UploadField::FilePath,
            UploadField::FilePath => UploadField::Submit,
            UploadField::Submit => UploadField::DocumentType,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            UploadField::DocumentType => UploadField::Submit,
            UploadField::FilePath => UploadField::DocumentType,
            UploadField::Submit => UploadField::FilePath,
        }
    }
}

/// Open review dialog for one transfer certificate request
#[derive(Debug, Clone)]
pub struct Review {
    pub target: TransferCertificate,
    pub form: TcDecisionForm,
    pub errors: ValidationErrors,
    pub error: Option<String>,
    pub saving: bool,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from spawned fetch and submit tasks.
pub enum FetchResult {
    Profile(Result<StudentProfile, DataFetchError>),
    AcademicRecords(Result<Vec<AcademicRecord>, DataFetchError>),
    Documents(Result<Vec<StudentDocument>, DataFetchError>),
    TransferCertificates(Result<Vec<TransferCertificate>, DataFetchError>),
    Schemes(Result<Vec<SchemeEnrollment>, DataFetchError>),
    AdminSummary(Result<AdminSummary, DataFetchError>),
    Students(Result<Vec<StudentSummary>, DataFetchError>),
    /// Details for the student with the given id
    StudentDetails(String, Result<StudentProfile, DataFetchError>),
    TransferRequests(Result<Vec<TransferCertificate>, DataFetchError>),
    Schools(Result<Vec<School>, DataFetchError>),
    ApplicationSubmitted(Result<(), SubmitError>),
    DocumentUploaded(Result<(), DataFetchError>),
    DecisionSaved(Result<(), SubmitError>),
}

impl FetchResult {
    /// The backend refused the session token
    fn is_unauthorized(&self) -> bool {
        let error = match self {
            FetchResult::ApplicationSubmitted(r) | FetchResult::DecisionSaved(r) => {
                return r.as_ref().is_err_and(SubmitError::is_unauthorized);
            }
            FetchResult::Profile(r) | FetchResult::StudentDetails(_, r) => r.as_ref().err(),
            FetchResult::AcademicRecords(r) => r.as_ref().err(),
            FetchResult::Documents(r) => r.as_ref().err(),
            FetchResult::TransferCertificates(r) | FetchResult::TransferRequests(r) => {
                r.as_ref().err()
            }
            FetchResult::Schemes(r) => r.as_ref().err(),
            FetchResult::AdminSummary(r) => r.as_ref().err(),
            FetchResult::Students(r) => r.as_ref().err(),
            FetchResult::Schools(r) => r.as_ref().err(),
            FetchResult::DocumentUploaded(r) => r.as_ref().err(),
        };
        error.is_some_and(|e| e.is_unauthorized())
    }
}

/// A result plus the ticket of the view that asked for it.
pub struct Ticketed {
    pub ticket: FetchTicket,
    pub result: FetchResult,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App<T: Transport = HttpTransport> {
    // Core services
    pub config: Config,
    pub store: SessionStore,
    pub client: ApiClient<T>,
    pub navigator: Navigator,

    // UI State
    pub state: AppState,
    pub status_message: Option<String>,
    pub selection: usize,
    pub goto_input: String,

    // Login form state
    pub login_form: LoginForm,
    pub login_focus: LoginFocus,
    pub login_errors: ValidationErrors,
    pub login_error: Option<String>,
    pub remember_password: bool,
    pending_login: Option<Credentials>,

    // Student views
    pub profile: Loadable<StudentProfile>,
    pub records: Loadable<Vec<AcademicRecord>>,
    pub documents: Loadable<Vec<StudentDocument>>,
    pub certificates: Loadable<Vec<TransferCertificate>>,
    pub schemes: Loadable<Vec<SchemeEnrollment>>,

    pub tc_form: TransferCertificateForm,
    pub tc_focus: TcField,
    pub tc_errors: ValidationErrors,
    pub tc_error: Option<String>,
    pub tc_submitting: bool,

    pub upload_form: DocumentUploadForm,
    pub upload_focus: UploadField,
    pub upload_errors: ValidationErrors,
    pub upload_error: Option<String>,
    pub uploading: bool,

    // Admin views
    pub summary: Loadable<AdminSummary>,
    pub students: Loadable<Vec<StudentSummary>>,
    pub student_filter: StudentFilter,
    pub student_details: Loadable<StudentProfile>,
    /// Student whose details were requested last
    details_for: Option<String>,
    pub requests: Loadable<ApprovalQueue>,
    pub schools: Loadable<Vec<School>>,
    pub review: Option<Review>,

    // Background task channel
    fetch_rx: mpsc::Receiver<Ticketed>,
    fetch_tx: mpsc::Sender<Ticketed>,
}

impl App<HttpTransport> {
    /// Create a new application instance from the on-disk config and session
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let store = match SessionVault::from_keychain() {
            Ok(vault) => SessionStore::new(cache_dir).with_vault(vault),
            Err(e) => {
                warn!(error = %e, "Keychain unavailable, session stored unencrypted");
                SessionStore::new(cache_dir)
            }
        };

        Self::with_parts(config, store)
    }

    /// Assemble an app from an already loaded config and store
    pub fn with_parts(config: Config, store: SessionStore) -> Result<Self> {
        let client = ApiClient::from_config(&config)?;
        Ok(Self::with_client(config, store, client))
    }
}

impl<T: Transport> App<T> {
    /// Assemble an app around an existing API client
    pub fn with_client(config: Config, mut store: SessionStore, mut client: ApiClient<T>) -> Self {
        store.restore();
        client.set_token(store.token().map(str::to_string));

        let mut login_form = LoginForm {
            username: config.last_username.clone().unwrap_or_default(),
            password: String::new(),
            role: Some(config.last_role.unwrap_or(Role::Student)),
        };
        login_form.password = Self::initial_password(&config, &login_form);

        let (fetch_tx, fetch_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            remember_password: config.remember_password,
            config,
            store,
            client,
            navigator: Navigator::new(),

            state: AppState::Normal,
            status_message: None,
            selection: 0,
            goto_input: String::new(),

            login_focus: if login_form.username.is_empty() {
                LoginFocus::Username
            } else {
                LoginFocus::Password
            },
            login_form,
            login_errors: ValidationErrors::new(),
            login_error: None,
            pending_login: None,

            profile: Loadable::Idle,
            records: Loadable::Idle,
            documents: Loadable::Idle,
            certificates: Loadable::Idle,
            schemes: Loadable::Idle,

            tc_form: TransferCertificateForm::default(),
            tc_focus: TcField::Reason,
            tc_errors: ValidationErrors::new(),
            tc_error: None,
            tc_submitting: false,

            upload_form: DocumentUploadForm::default(),
            upload_focus: UploadField::DocumentType,
            upload_errors: ValidationErrors::new(),
            upload_error: None,
            uploading: false,

            summary: Loadable::Idle,
            students: Loadable::Idle,
            student_filter: StudentFilter::default(),
            student_details: Loadable::Idle,
            details_for: None,
            requests: Loadable::Idle,
            schools: Loadable::Idle,
            review: None,

            fetch_rx,
            fetch_tx,
        }
    }

    /// Password from the environment, or from the keychain when remembered
    fn initial_password(config: &Config, form: &LoginForm) -> String {
        if let Some(password) = Config::env_password() {
            return password;
        }
        match (config.remember_password, form.role) {
            (true, Some(role)) if !form.username.is_empty() => {
                CredentialStore::get_password(&form.username, role).unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.store.current()
    }

    pub fn view(&self) -> &ViewDescriptor {
        self.navigator.current()
    }

    pub fn route(&self) -> Route {
        self.navigator.route()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// First view after startup: the requested path, or the role home for a
    /// restored session, or login.
    pub fn start(&mut self, initial_path: Option<&str>) {
        let route = match (initial_path, self.store.role()) {
            (Some(path), _) => Route::from_path(path),
            (None, Some(role)) => role.home_route(),
            (None, None) => Route::Login,
        };
        self.navigate(route);
    }

    /// Navigate through the route guard and start loading the new view.
    pub fn navigate(&mut self, route: Route) {
        let view = self.navigator.go(route, self.store.current());
        if view.route != route {
            debug!(requested = %route, resolved = %view.route, "Navigation redirected");
        }
        self.state = AppState::Normal;
        self.selection = 0;
        self.review = None;
        // Results of in-flight submissions are dropped with the old epoch
        self.tc_submitting = false;
        self.uploading = false;
        self.load_current_view();
    }

    pub fn navigate_path(&mut self, path: &str) {
        self.navigate(Route::from_path(path));
    }

    /// Jump to the n-th entry (1-based) of the current role's menu
    pub fn navigate_menu(&mut self, index: usize) {
        let target = self
            .view()
            .layout
            .as_ref()
            .and_then(|layout| layout.nav.get(index.wrapping_sub(1)).copied());
        if let Some(route) = target {
            self.navigate(route);
        }
    }

    /// Reload the data of the current view
    pub fn reload(&mut self) {
        let route = self.route();
        self.navigate(route);
    }

    /// Spawn a task whose result is delivered under the current view's ticket
    fn spawn_fetch<F, Fut>(&self, make: F)
    where
        F: FnOnce(ApiClient<T>) -> Fut,
        Fut: Future<Output = FetchResult> + Send + 'static,
    {
        let ticket = self.navigator.epoch().ticket();
        let tx = self.fetch_tx.clone();
        let task = make(self.client.clone());
        tokio::spawn(async move {
            let result = task.await;
            if let Err(e) = tx.send(Ticketed { ticket, result }).await {
                error!(error = %e, "Failed to send fetch result - channel closed");
            }
        });
    }

    fn student_id(&self) -> Option<String> {
        self.store.current().map(|s| s.user_id.clone())
    }

    fn load_current_view(&mut self) {
        let route = self.route();
        let student_id = self.student_id();

        match (route, student_id) {
            (Route::StudentProfile, Some(id)) => {
                self.profile = Loadable::Loading;
                self.spawn_fetch(move |client| async move {
                    FetchResult::Profile(client.fetch_profile(&id).await)
                });
            }
            (Route::AcademicRecords, Some(id)) => {
                self.records = Loadable::Loading;
                self.spawn_fetch(move |client| async move {
                    FetchResult::AcademicRecords(client.fetch_academic_records(&id).await)
                });
            }
            (Route::TransferCertificate, Some(id)) => {
                self.certificates = Loadable::Loading;
                self.spawn_fetch(move |client| async move {
                    FetchResult::TransferCertificates(client.fetch_transfer_certificates(&id).await)
                });
            }
            (Route::DocumentUpload, Some(id)) => {
                self.documents = Loadable::Loading;
                self.spawn_fetch(move |client| async move {
                    FetchResult::Documents(client.fetch_documents(&id).await)
                });
            }
            (Route::SchemeHistory, Some(id)) => {
                self.schemes = Loadable::Loading;
                self.spawn_fetch(move |client| async move {
                    FetchResult::Schemes(client.fetch_schemes(&id).await)
                });
            }
            (Route::AdminDashboard, _) => {
                self.summary = Loadable::Loading;
                self.spawn_fetch(|client| async move {
                    FetchResult::AdminSummary(load_admin_summary(&client).await)
                });
            }
            (Route::AdminStudents, _) => {
                self.students = Loadable::Loading;
                self.student_details = Loadable::Idle;
                self.details_for = None;
                self.spawn_fetch(|client| async move {
                    FetchResult::Students(client.fetch_students().await)
                });
            }
            (Route::AdminTransferCertificates, _) => {
                self.requests = Loadable::Loading;
                self.spawn_fetch(|client| async move {
                    FetchResult::TransferRequests(client.fetch_transfer_requests().await)
                });
            }
            (Route::AdminSchools, _) => {
                self.schools = Loadable::Loading;
                self.spawn_fetch(|client| async move {
                    FetchResult::Schools(client.fetch_schools().await)
                });
            }
            _ => {}
        }
    }

    // =========================================================================
    // Login / Logout
    // =========================================================================

    /// Validate the login form and queue the attempt. The attempt itself runs
    /// in `run_pending_login` after the next frame, so "Logging in..." shows.
    pub fn submit_login(&mut self) {
        self.login_error = None;
        match self.login_form.validate() {
            Ok(credentials) => {
                self.login_errors = ValidationErrors::new();
                self.pending_login = Some(credentials);
            }
            Err(errors) => self.login_errors = errors,
        }
    }

    pub fn is_logging_in(&self) -> bool {
        self.pending_login.is_some()
    }

    pub async fn run_pending_login(&mut self) {
        let Some(credentials) = self.pending_login.take() else {
            return;
        };

        let authenticator = Authenticator::new(self.client.clone());
        match authenticator.sign_in(&mut self.store, &credentials).await {
            Ok(home) => {
                self.client.set_token(self.store.token().map(str::to_string));
                self.after_login(&credentials);
                self.navigate(home);
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(e.user_message().to_string());
            }
        }
    }

    fn after_login(&mut self, credentials: &Credentials) {
        self.config.remember_login(&credentials.username, credentials.role);
        self.config.remember_password = self.remember_password;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        let stored = if self.remember_password {
            CredentialStore::store(&credentials.username, credentials.role, &credentials.password)
        } else {
            CredentialStore::delete(&credentials.username, credentials.role)
        };
        if let Err(e) = stored {
            warn!(error = %e, "Failed to update stored credentials");
        }

        self.login_form.password.clear();
        self.login_error = None;
        self.status_message = None;
        info!("Login successful");
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.client.clear_token();
        self.clear_view_data();
        self.login_focus = LoginFocus::Password;
        self.status_message = Some("Logged out".to_string());
        info!("Logged out");
        self.navigate(Route::Login);
    }

    fn clear_view_data(&mut self) {
        self.profile = Loadable::Idle;
        self.records = Loadable::Idle;
        self.documents = Loadable::Idle;
        self.certificates = Loadable::Idle;
        self.schemes = Loadable::Idle;
        self.summary = Loadable::Idle;
        self.students = Loadable::Idle;
        self.student_details = Loadable::Idle;
        self.details_for = None;
        self.requests = Loadable::Idle;
        self.schools = Loadable::Idle;
        self.tc_form.reset();
        self.upload_form.reset();
        self.student_filter = StudentFilter::default();
        self.review = None;
    }

    // =========================================================================
    // Student submissions
    // =========================================================================

    /// Submit the transfer certificate form. The client validates it first and
    /// sends nothing when a field is invalid; the field errors come back in
    /// the result.
    pub fn submit_transfer_certificate(&mut self) {
        if self.tc_submitting {
            return;
        }
        let Some(id) = self.student_id() else {
            return;
        };

        self.tc_error = None;
        self.tc_errors = ValidationErrors::new();
        self.tc_submitting = true;
        let form = self.tc_form.clone();
        self.spawn_fetch(move |client| async move {
            FetchResult::ApplicationSubmitted(client.submit_transfer_certificate(&id, &form).await)
        });
    }

    pub fn submit_upload(&mut self) {
        if self.uploading {
            return;
        }
        self.upload_error = None;
        let upload = match self.upload_form.prepare() {
            Ok(upload) => upload,
            Err(errors) => {
                self.upload_errors = errors;
                return;
            }
        };
        let Some(id) = self.student_id() else {
            return;
        };

        self.upload_errors = ValidationErrors::new();
        self.uploading = true;
        self.spawn_fetch(move |client| async move {
            FetchResult::DocumentUploaded(client.upload_document(&id, upload).await)
        });
    }

    // =========================================================================
    // Admin actions
    // =========================================================================

    /// Students matching the search box, in backend order
    pub fn filtered_students(&self) -> Vec<&StudentSummary> {
        match self.students.ready() {
            Some(students) => self.student_filter.apply(students),
            None => Vec::new(),
        }
    }

    pub fn load_selected_student(&mut self) {
        let Some(id) = self
            .filtered_students()
            .get(self.selection)
            .map(|s| s.student_id.clone())
        else {
            return;
        };
        self.student_details = Loadable::Loading;
        self.details_for = Some(id.clone());
        self.spawn_fetch(move |client| async move {
            let result = client.fetch_student_details(&id).await;
            FetchResult::StudentDetails(id, result)
        });
    }

    pub fn selected_request(&self) -> Option<&TransferCertificate> {
        self.requests.ready().and_then(|q| q.get(self.selection))
    }

    /// Open the review dialog with a pre-selected decision
    pub fn open_review(&mut self, status: TcStatus) {
        let Some(target) = self.selected_request().cloned() else {
            return;
        };
        if !target.status.is_pending() {
            self.status_message = Some(format!(
                "Request {} is already {}",
                target.tc_id,
                target.status.as_str()
            ));
            return;
        }
        self.review = Some(Review {
            target,
            form: TcDecisionForm::with_status(status),
            errors: ValidationErrors::new(),
            error: None,
            saving: false,
        });
        self.state = AppState::Reviewing;
    }

    pub fn close_review(&mut self) {
        self.review = None;
        self.state = AppState::Normal;
    }

    pub fn submit_review(&mut self) {
        let Some(review) = self.review.as_mut() else {
            return;
        };
        if review.saving {
            return;
        }
        review.error = None;
        review.errors = ValidationErrors::new();
        review.saving = true;
        let target = review.target.clone();
        let form = review.form.clone();

        self.spawn_fetch(move |client| async move {
            FetchResult::DecisionSaved(client.review_transfer_certificate(&target, &form).await)
        });
    }

    // =========================================================================
    // Background results
    // =========================================================================

    /// Drain finished tasks and apply their results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.apply(result);
        }
    }

    pub(crate) fn apply(&mut self, ticketed: Ticketed) {
        if !self.navigator.epoch().is_current(ticketed.ticket) {
            debug!("Dropping result for a view that is no longer shown");
            return;
        }
        if ticketed.result.is_unauthorized() {
            warn!("Session token rejected, signing out");
            self.logout();
            self.status_message = Some("Your session has expired. Please log in again.".to_string());
            return;
        }

        match ticketed.result {
            FetchResult::Profile(r) => self.profile = Loadable::from_result(r),
            FetchResult::AcademicRecords(r) => self.records = Loadable::from_result(r),
            FetchResult::Documents(r) => self.documents = Loadable::from_result(r),
            FetchResult::TransferCertificates(r) => self.certificates = Loadable::from_result(r),
            FetchResult::Schemes(r) => self.schemes = Loadable::from_result(r),
            FetchResult::AdminSummary(r) => self.summary = Loadable::from_result(r),
            FetchResult::Students(r) => self.students = Loadable::from_result(r),
            FetchResult::StudentDetails(id, r) => {
                if self.details_for.as_deref() == Some(id.as_str()) {
                    self.student_details = Loadable::from_result(r);
                } else {
                    debug!(student = %id, "Dropping details for a student no longer selected");
                }
            }
            FetchResult::TransferRequests(r) => {
                self.requests = Loadable::from_result(r.map(ApprovalQueue::new))
            }
            FetchResult::Schools(r) => self.schools = Loadable::from_result(r),

            FetchResult::ApplicationSubmitted(r) => {
                self.tc_submitting = false;
                match r {
                    Ok(()) => {
                        self.tc_form.reset();
                        self.tc_focus = TcField::Reason;
                        self.status_message =
                            Some("Transfer certificate application submitted successfully".to_string());
                        self.reload();
                    }
                    Err(SubmitError::Invalid(errors)) => self.tc_errors = errors,
                    Err(SubmitError::Failed(e)) => self.tc_error = Some(e.user_message().to_string()),
                }
            }
            FetchResult::DocumentUploaded(r) => {
                self.uploading = false;
                match r {
                    Ok(()) => {
                        self.upload_form.reset();
                        self.upload_focus = UploadField::DocumentType;
                        self.status_message = Some("Document uploaded successfully".to_string());
                        self.reload();
                    }
                    Err(e) => self.upload_error = Some(e.user_message().to_string()),
                }
            }
            FetchResult::DecisionSaved(r) => match r {
                Ok(()) => {
                    self.status_message = Some("Transfer certificate updated".to_string());
                    self.reload();
                }
                Err(e) => {
                    if let Some(review) = self.review.as_mut() {
                        review.saving = false;
                        match e {
                            SubmitError::Invalid(errors) => review.errors = errors,
                            SubmitError::Failed(e) => review.error = Some(e.user_message().to_string()),
                        }
                    }
                }
            },
        }
    }

    /// Number of rows in the current view's list, for selection bounds
    pub fn list_len(&self) -> usize {
        match self.route() {
            Route::AdminStudents => self.filtered_students().len(),
            Route::AdminTransferCertificates => self.requests.ready().map_or(0, |q| q.len()),
            Route::AdminSchools => self.schools.ready().map_or(0, |s| s.len()),
            Route::DocumentUpload => self.documents.ready().map_or(0, |d| d.len()),
            Route::TransferCertificate => self.certificates.ready().map_or(0, |c| c.len()),
            Route::SchemeHistory => self.schemes.ready().map_or(0, |s| s.len()),
            Route::StudentDashboard | Route::AdminDashboard => {
                self.view().layout.as_ref().map_or(0, |l| l.nav.len())
            }
            _ => 0,
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a character can be added to a free-text field
pub fn can_add_text_char(current_len: usize, c: char) -> bool {
    current_len < MAX_TEXT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};

    use schoolportal_core::api::{ApiError, ApiRequest, Method};
    use schoolportal_core::forms::Field;
    use schoolportal_core::models::DocumentType;

    /// Canned backend reply for one `METHOD path`
    #[derive(Clone)]
    pub(crate) enum Reply {
        Json(Value),
        Unauthorized,
        ServerError,
    }

    /// In-memory backend keyed by method and path. Unknown requests get an
    /// empty body.
    #[derive(Clone, Default)]
    pub(crate) struct StubTransport {
        replies: Arc<Mutex<HashMap<String, Reply>>>,
        requests: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl StubTransport {
        pub fn reply(&self, method: Method, path: &str, reply: Reply) {
            let key = format!("{} {}", method.as_str(), path);
            self.replies.lock().unwrap().insert(key, reply);
        }

        /// `METHOD path` of every request seen so far
        pub fn sent(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| format!("{} {}", r.method.as_str(), r.path))
                .collect()
        }

        pub fn sent_with(&self, method: Method) -> usize {
            self.requests.lock().unwrap().iter().filter(|r| r.method == method).count()
        }
    }

    impl Transport for StubTransport {
        async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
            let key = format!("{} {}", request.method.as_str(), request.path);
            let reply = self.replies.lock().unwrap().get(&key).cloned();
            self.requests.lock().unwrap().push(request);
            match reply {
                Some(Reply::Json(body)) => Ok(body),
                Some(Reply::Unauthorized) => Err(ApiError::Unauthorized),
                Some(Reply::ServerError) => Err(ApiError::ServerError("unavailable".to_string())),
                None => Ok(Value::Null),
            }
        }
    }

    pub(crate) fn test_app(
        dir: &std::path::Path,
        role: Option<Role>,
    ) -> (App<StubTransport>, StubTransport) {
        let stub = StubTransport::default();
        let mut app = App::with_client(
            Config::default(),
            SessionStore::new(dir.to_path_buf()),
            ApiClient::new(stub.clone()),
        );
        if let Some(role) = role {
            let session = Session::new("1001", "Rahul Kumar", "rahul", role, "t1").unwrap();
            app.store.set(session).unwrap();
            app.client.set_token(Some("t1".to_string()));
        }
        (app, stub)
    }

    /// Let spawned requests finish, then apply whatever they sent back
    pub(crate) async fn settle<T: Transport>(app: &mut App<T>) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        app.check_background_tasks();
    }

    fn pending_request() -> TransferCertificate {
        serde_json::from_value(json!({
            "tc_id": 101,
            "student_id": 1001,
            "student_name": "Rahul Kumar",
            "destination_school": "Delhi Public School",
            "reason": "Family relocating to Delhi",
            "status": "pending"
        }))
        .unwrap()
    }

    fn profile(id: &str, name: &str) -> StudentProfile {
        StudentProfile {
            student_id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn fill_tc_form(app: &mut App<StubTransport>) {
        app.tc_form = TransferCertificateForm {
            reason: "Family relocating to Delhi".to_string(),
            destination_school: "Delhi Public School".to_string(),
            transfer_date: "2025-04-01".to_string(),
            additional_info: String::new(),
            parent_consent: true,
        };
    }

    // -------------------------------------------------------------------------
    // Focus cycling
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_focus_cycle() {
        let mut focus = LoginFocus::Username;
        for _ in 0..5 {
            focus = focus.next();
        }
        assert_eq!(focus, LoginFocus::Username);
        assert_eq!(LoginFocus::Username.prev(), LoginFocus::Button);
    }

    #[test]
    fn test_tc_field_cycle() {
        assert_eq!(TcField::Submit.next(), TcField::Reason);
        assert_eq!(TcField::Reason.prev(), TcField::Submit);
        assert!(TcField::TransferDate.is_text());
        assert!(!TcField::ParentConsent.is_text());
    }

    #[test]
    fn test_upload_field_cycle() {
        assert_eq!(UploadField::Submit.next(), UploadField::DocumentType);
        assert_eq!(UploadField::DocumentType.prev(), UploadField::Submit);
    }

    // -------------------------------------------------------------------------
    // Input helpers
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(!can_add_username_char(MAX_USERNAME_LENGTH, 'a'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(MAX_PASSWORD_LENGTH - 1, '!'));
        assert!(!can_add_password_char(MAX_PASSWORD_LENGTH, '!'));
    }

    // -------------------------------------------------------------------------
    // Navigation and results
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_anonymous_start_goes_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), None);
        app.start(Some("/student/profile"));
        assert_eq!(app.route(), Route::Login);

        settle(&mut app).await;
        assert!(stub.sent().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_role_navigation_redirects_home() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _stub) = test_app(dir.path(), Some(Role::Admin));

        app.navigate(Route::AcademicRecords);
        assert_eq!(app.route(), Route::AdminDashboard);
        assert!(app.summary.is_loading());
    }

    #[tokio::test]
    async fn test_view_loads_from_backend() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Admin));
        stub.reply(
            Method::Get,
            "/admin/schools",
            Reply::Json(json!({"schools": [{"school_id": 1, "name": "Delhi Public School"}]})),
        );

        app.navigate(Route::AdminSchools);
        settle(&mut app).await;
        assert_eq!(app.schools.ready().map(Vec::len), Some(1));
        assert_eq!(stub.sent(), vec!["GET /admin/schools"]);
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _stub) = test_app(dir.path(), Some(Role::Admin));

        app.navigate(Route::AdminSchools);
        let stale = app.navigator.epoch().ticket();
        app.navigate(Route::AdminStudents);

        app.apply(Ticketed {
            ticket: stale,
            result: FetchResult::Schools(Ok(Vec::new())),
        });
        assert!(app.schools.is_loading());

        let current = app.navigator.epoch().ticket();
        app.apply(Ticketed {
            ticket: current,
            result: FetchResult::Students(Ok(Vec::new())),
        });
        assert_eq!(app.students.ready().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_details_for_previous_student_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _stub) = test_app(dir.path(), Some(Role::Admin));
        app.navigate(Route::AdminStudents);
        let ticket = app.navigator.epoch().ticket();
        let students = serde_json::from_value(json!([
            {"student_id": "1001", "name": "Rahul Kumar"},
            {"student_id": "1002", "name": "Priya Singh"}
        ]))
        .unwrap();
        app.apply(Ticketed {
            ticket,
            result: FetchResult::Students(Ok(students)),
        });

        app.selection = 0;
        app.load_selected_student();
        app.selection = 1;
        app.load_selected_student();

        // Replies arrive newest first
        app.apply(Ticketed {
            ticket,
            result: FetchResult::StudentDetails("1002".to_string(), Ok(profile("1002", "Priya Singh"))),
        });
        app.apply(Ticketed {
            ticket,
            result: FetchResult::StudentDetails("1001".to_string(), Ok(profile("1001", "Rahul Kumar"))),
        });
        assert_eq!(app.student_details.ready().map(|p| p.name.as_str()), Some("Priya Singh"));
    }

    #[tokio::test]
    async fn test_expired_session_returns_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Student));
        stub.reply(Method::Get, "/students/1001/academic-records", Reply::Unauthorized);

        app.navigate(Route::AcademicRecords);
        settle(&mut app).await;

        assert_eq!(app.route(), Route::Login);
        assert!(app.session().is_none());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Your session has expired. Please log in again.")
        );
        let mut fresh = SessionStore::new(dir.path().to_path_buf());
        assert!(fresh.restore().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_on_submission() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Student));
        stub.reply(Method::Post, "/students/1001/transfer-certificate", Reply::Unauthorized);
        app.navigate(Route::TransferCertificate);
        settle(&mut app).await;

        fill_tc_form(&mut app);
        app.submit_transfer_certificate();
        settle(&mut app).await;
        assert_eq!(app.route(), Route::Login);
        assert!(app.session().is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_message() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Student));
        stub.reply(Method::Get, "/students/1001/schemes", Reply::ServerError);

        app.navigate(Route::SchemeHistory);
        settle(&mut app).await;
        assert_eq!(
            app.schemes.error(),
            Some("Failed to load scheme history. Please try again later.")
        );
        assert_eq!(app.route(), Route::SchemeHistory);
    }

    // -------------------------------------------------------------------------
    // Submissions
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_invalid_tc_form_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Student));
        app.navigate(Route::TransferCertificate);
        settle(&mut app).await;

        app.tc_form.reason = "Relocation".to_string();
        app.submit_transfer_certificate();
        settle(&mut app).await;

        assert!(!app.tc_submitting);
        assert!(app.tc_errors.get(Field::ParentConsent).is_some());
        assert!(app.tc_errors.get(Field::DestinationSchool).is_some());
        assert!(app.tc_error.is_none());
        assert_eq!(stub.sent_with(Method::Post), 0);
    }

    #[tokio::test]
    async fn test_tc_submission_success_resets_form() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Student));
        stub.reply(Method::Post, "/students/1001/transfer-certificate", Reply::Json(json!({})));
        app.navigate(Route::TransferCertificate);
        settle(&mut app).await;

        fill_tc_form(&mut app);
        app.submit_transfer_certificate();
        assert!(app.tc_submitting);
        settle(&mut app).await;

        assert!(!app.tc_submitting);
        assert!(app.tc_form.reason.is_empty());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Transfer certificate application submitted successfully")
        );
        // History is reloaded after the submission
        settle(&mut app).await;
        let gets = stub
            .sent()
            .iter()
            .filter(|s| s.as_str() == "GET /students/1001/transfer-certificate")
            .count();
        assert_eq!(gets, 2);
    }

    #[tokio::test]
    async fn test_tc_submission_failure_keeps_form() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Student));
        stub.reply(Method::Post, "/students/1001/transfer-certificate", Reply::ServerError);
        app.navigate(Route::TransferCertificate);
        settle(&mut app).await;

        fill_tc_form(&mut app);
        app.submit_transfer_certificate();
        settle(&mut app).await;

        assert!(!app.tc_submitting);
        assert_eq!(app.tc_error.as_deref(), Some("Failed to submit application. Please try again."));
        assert_eq!(app.tc_form.destination_school, "Delhi Public School");
    }

    #[tokio::test]
    async fn test_document_upload_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("aadhar.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();

        let (mut app, stub) = test_app(dir.path(), Some(Role::Student));
        stub.reply(Method::Post, "/students/1001/documents/upload", Reply::ServerError);
        app.navigate(Route::DocumentUpload);
        settle(&mut app).await;

        app.upload_form.document_type = Some(DocumentType::AadharCard);
        app.upload_form.file_path = file.display().to_string();
        app.submit_upload();
        settle(&mut app).await;
        assert!(!app.uploading);
        assert_eq!(app.upload_error.as_deref(), Some("Failed to upload document. Please try again."));
        assert!(!app.upload_form.file_path.is_empty());

        stub.reply(Method::Post, "/students/1001/documents/upload", Reply::Json(json!({})));
        app.submit_upload();
        settle(&mut app).await;
        assert!(app.upload_error.is_none());
        assert!(app.upload_form.file_path.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Document uploaded successfully"));
    }

    #[tokio::test]
    async fn test_review_decision_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Admin));
        stub.reply(
            Method::Get,
            "/admin/transfer-certificates",
            Reply::Json(json!({"transferCertificates": [pending_request()]})),
        );
        stub.reply(Method::Patch, "/admin/transfer-certificates/101", Reply::ServerError);
        app.navigate(Route::AdminTransferCertificates);
        settle(&mut app).await;

        app.open_review(TcStatus::Approved);
        app.submit_review();
        settle(&mut app).await;
        let review = app.review.as_ref().unwrap();
        assert!(!review.saving);
        assert_eq!(
            review.error.as_deref(),
            Some("Failed to update transfer certificate. Please try again.")
        );

        stub.reply(Method::Patch, "/admin/transfer-certificates/101", Reply::Json(json!({})));
        app.submit_review();
        settle(&mut app).await;
        assert!(app.review.is_none());
        assert_eq!(app.status_message.as_deref(), Some("Transfer certificate updated"));
    }

    #[tokio::test]
    async fn test_decision_on_decided_request_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, stub) = test_app(dir.path(), Some(Role::Admin));
        app.navigate(Route::AdminTransferCertificates);
        settle(&mut app).await;

        let mut decided = pending_request();
        decided.status = TcStatus::Approved;
        app.review = Some(Review {
            target: decided,
            form: TcDecisionForm::with_status(TcStatus::Rejected),
            errors: ValidationErrors::new(),
            error: None,
            saving: false,
        });
        app.state = AppState::Reviewing;

        app.submit_review();
        settle(&mut app).await;
        let review = app.review.as_ref().unwrap();
        assert!(!review.saving);
        assert!(review.errors.get(Field::Status).is_some());
        assert_eq!(stub.sent_with(Method::Patch), 0);
    }

    #[tokio::test]
    async fn test_empty_login_form_is_not_queued() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _stub) = test_app(dir.path(), None);
        app.login_form = LoginForm::default();
        app.submit_login();
        assert!(!app.is_logging_in());
        assert_eq!(app.login_errors.len(), 3);
    }
}
