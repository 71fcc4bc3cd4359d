//! # Wareflow Client
//!
//! Client-side request pipeline for the Wareflow API.
//!
//! This crate contains:
//! - HTTP transport (reqwest wrapper with a shared cookie jar)
//! - In-memory credential store with session lifecycle events
//! - Single-flight credential renewal
//! - The authenticated request pipeline ([`api::ApiClient`])
//! - Configuration loading (environment variables and config files)
//!
//! ## Architecture
//! - Depends only on `wareflow-domain`
//! - Every API call goes through [`api::ApiClient::execute`]
//! - Credential renewal and the single 401 retry are transparent to callers

pub mod api;
pub mod auth;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, ApiRequest, ApiResponse};
pub use auth::{
    AccessToken, AuthService, CredentialStore, RefreshCoordinator, RefreshEndpoint, RefreshError,
    SessionEvent, TokenResponse,
};
pub use http::{HttpClient, HttpClientBuilder};
