//! Credential lifecycle for the Wareflow API
//!
//! This module owns everything that happens to an access token between
//! login and logout: storage, attachment to outgoing requests, renewal
//! when the server stops accepting it, and the session-ended signal the
//! application listens for.
//!
//! # Features
//!
//! - **In-memory credential store**: Single source of truth for the
//!   current access token, with broadcast session events
//! - **Single-flight renewal**: Concurrent 401s collapse into one
//!   refresh call; every waiter receives the same outcome
//! - **Exemption rules**: Login, registration, and refresh paths never
//!   carry a bearer token and never trigger renewal
//! - **Session service**: High-level login/register/logout built on the
//!   same pipeline as ordinary calls
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   AuthService    │  Session establishment (login / register / logout)
//! └────────┬─────────┘
//!          │
//!          ├──► CredentialStore     (token slot + SessionEvent broadcast)
//!          │
//!          └──► RefreshCoordinator  (single-flight renewal)
//!                     │
//!                     └──► RefreshEndpoint  (cookie-backed /auth/refresh call)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use wareflow_client::api::ApiClient;
//! use wareflow_client::auth::AuthService;
//! use wareflow_domain::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig {
//!         base_url: "https://api.wareflow.example/v1".to_string(),
//!         timeout_seconds: 30,
//!         user_agent: "wareflow-demo/1.0".to_string(),
//!     };
//!
//!     let api = Arc::new(ApiClient::builder().config(config).build()?);
//!     let auth = AuthService::new(Arc::clone(&api));
//!
//!     auth.login("ops@wareflow.example", "password").await?;
//!
//!     // Decorated with the stored token; renewed transparently on 401.
//!     let orders: serde_json::Value = api.get("/orders").await?;
//!     println!("{orders:#}");
//!
//!     auth.logout();
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`token`]**: Access token newtype and the refresh response shape
//! - **[`store`]**: In-memory credential store with session events
//! - **[`exempt`]**: Path exemption rules for credential-issuing endpoints
//! - **[`refresh`]**: Single-flight renewal coordinator and HTTP endpoint
//! - **[`service`]**: Login, registration, and logout operations

pub mod exempt;
pub mod refresh;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types and functions
pub use exempt::{is_exempt, EXEMPT_PATH_MARKERS};
pub use refresh::{
    HttpRefreshEndpoint, RefreshCoordinator, RefreshEndpoint, RefreshError, RefreshOutcome,
};
pub use service::{AuthService, LoginRequest, RegisterRequest};
pub use store::{CredentialStore, SessionEvent};
pub use token::{AccessToken, TokenResponse};
