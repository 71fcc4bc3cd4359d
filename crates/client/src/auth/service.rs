//! Session establishment and teardown
//!
//! Client-side counterpart of the credential-issuing endpoints. Login and
//! registration travel through the same pipeline as every other call, but
//! their paths are exempt: no bearer header is attached, and a 401 from
//! them is a final answer rather than a renewal trigger.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, instrument};
use wareflow_domain::constants::{AUTH_LOGIN_PATH, AUTH_REGISTER_PATH};
use wareflow_domain::UserProfile;

use super::store::{CredentialStore, SessionEvent};
use super::token::{AccessToken, TokenResponse};
use crate::api::{ApiClient, ApiError};

/// Credentials submitted to `/auth/login`
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// New-account details submitted to `/auth/register`
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Organization the new account is created under
    pub org_name: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("org_name", &self.org_name)
            .finish()
    }
}

/// High-level session operations for the Wareflow API
///
/// Successful login or registration stores the issued access token; the
/// server simultaneously sets the ambient session cookie on the shared
/// transport, which later feeds credential renewal.
pub struct AuthService {
    api: Arc<ApiClient>,
    store: Arc<CredentialStore>,
}

impl AuthService {
    /// Create a service operating on the given client and its store
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        let store = Arc::clone(api.store());
        Self { api, store }
    }

    /// Authenticate with email and password
    ///
    /// On success the issued token is stored and subsequent API calls are
    /// decorated with it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] untouched when the credentials are
    /// rejected; a login 401 never triggers renewal.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<UserProfile>, ApiError> {
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        let response: TokenResponse = self.api.post(AUTH_LOGIN_PATH, &body).await?;

        self.store.set(AccessToken::new(response.access_token));
        info!("login succeeded");

        Ok(response.user)
    }

    /// Create a new account and open its first session
    ///
    /// # Errors
    ///
    /// Returns the mapped API error when registration is rejected.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<UserProfile>, ApiError> {
        let response: TokenResponse = self.api.post(AUTH_REGISTER_PATH, request).await?;

        self.store.set(AccessToken::new(response.access_token));
        info!("registration succeeded");

        Ok(response.user)
    }

    /// End the local session
    ///
    /// Clears the stored credential, which emits [`SessionEvent::Ended`]
    /// for subscribers. Server-side session revocation is left to the
    /// surrounding application.
    pub fn logout(&self) {
        self.store.clear();
    }

    /// Whether a credential is currently held
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Subscribe to session lifecycle events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.store.subscribe()
    }
}
