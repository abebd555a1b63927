use std::fmt;

use tracing::{info, warn};

use crate::api::{ApiClient, HttpTransport, Transport};
use crate::error::AuthError;
use crate::models::Role;
use crate::routes::Route;

use super::{Session, SessionStore};

/// Login input. Transient: never persisted or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Exchanges credentials for a session against `POST /auth/login`.
pub struct Authenticator<T: Transport = HttpTransport> {
    client: ApiClient<T>,
}

impl<T: Transport> Authenticator<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    /// Build a session from a successful login. The session role is the role
    /// the user asked to sign in as.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let login = self.client.login(credentials).await.map_err(|e| {
            warn!(username = %credentials.username, error = %e, "Login failed");
            AuthError::from(e)
        })?;

        let display_name = login
            .user
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| credentials.username.clone());
        let username = login.user.username.unwrap_or_else(|| credentials.username.clone());

        Session::new(login.user.id, display_name, username, credentials.role, login.token)
            .map_err(|e| {
                warn!(username = %credentials.username, error = %e, "Login response rejected");
                AuthError::MalformedResponse(e.to_string())
            })
    }

    /// Authenticate, hand the session to `store`, and return the role's home
    /// route. On failure the store is left untouched.
    pub async fn sign_in(
        &self,
        store: &mut SessionStore,
        credentials: &Credentials,
    ) -> Result<Route, AuthError> {
        let session = self.authenticate(credentials).await?;
        let home = session.role.home_route();
        info!(user = %session.username, role = %session.role, "Signed in");

        if let Err(e) = store.set(session) {
            warn!(error = %e, "Failed to persist session; continuing with in-memory session");
        }
        Ok(home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::api::client::tests::FakeTransport;
    use crate::api::ApiError;
    use crate::guard::{GuardDecision, RouteGuard};

    fn creds(username: &str, role: Role) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: "x".to_string(),
            role,
        }
    }

    fn authenticator(fake: &FakeTransport) -> Authenticator<FakeTransport> {
        Authenticator::new(ApiClient::new(fake.clone()))
    }

    #[tokio::test]
    async fn test_admin_login_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path().to_path_buf());
        let fake = FakeTransport::default()
            .respond(Ok(json!({"user": {"id": 1, "name": "A"}, "token": "t1"})));

        let home = authenticator(&fake)
            .sign_in(&mut store, &creds("admin1", Role::Admin))
            .await
            .unwrap();
        assert_eq!(home, Route::AdminDashboard);

        let session = store.current().unwrap();
        assert_eq!(session.user_id, "1");
        assert_eq!(session.display_name, "A");
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.auth_token, "t1");

        assert!(matches!(
            RouteGuard::evaluate(Route::AdminStudents, store.current()),
            GuardDecision::Authorized(_)
        ));
        assert_eq!(
            RouteGuard::evaluate(Route::StudentProfile, store.current()),
            GuardDecision::WrongRole { home: Route::AdminDashboard }
        );
    }

    #[tokio::test]
    async fn test_session_role_matches_submitted_role() {
        for role in Role::ALL {
            let fake = FakeTransport::default()
                .respond(Ok(json!({"user": {"id": "ST12345"}, "token": "tok"})));
            let session = authenticator(&fake)
                .authenticate(&creds("someone", role))
                .await
                .unwrap();
            assert_eq!(session.role, role);
            assert!(!session.auth_token.is_empty());
            assert_eq!(session.display_name, "someone");
        }
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path().to_path_buf());
        let existing = Session::new("9", "Old", "old", Role::Student, "old-token").unwrap();
        store.set(existing.clone()).unwrap();

        let fake = FakeTransport::default().respond(Err(ApiError::Unauthorized));
        let err = authenticator(&fake)
            .sign_in(&mut store, &creds("admin1", Role::Admin))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Rejected(_)));
        assert_eq!(err.user_message(), "Invalid username or password");
        assert_eq!(store.current(), Some(&existing));
    }

    #[tokio::test]
    async fn test_empty_token_is_malformed() {
        let fake = FakeTransport::default()
            .respond(Ok(json!({"user": {"id": 1}, "token": ""})));
        let err = authenticator(&fake)
            .authenticate(&creds("admin1", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_network_failure_is_unavailable() {
        let fake = FakeTransport::default()
            .respond(Err(ApiError::ServerError("upstream down".to_string())));
        let err = authenticator(&fake)
            .authenticate(&creds("s1", Role::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unavailable(_)));
        assert_eq!(err.user_message(), "Invalid username or password");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let text = format!("{:?}", creds("admin1", Role::Admin));
        assert!(text.contains("admin1"));
        assert!(!text.contains("\"x\""));
    }
}
