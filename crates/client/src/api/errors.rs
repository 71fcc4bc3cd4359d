//! API-specific error types
//!
//! Provides error classification for API operations.

use std::time::Duration;

use thiserror::Error;
use wareflow_domain::WareflowError;

use crate::auth::RefreshError;

/// Categories of API errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) or a failed credential renewal
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth)
    Client,
    /// Network/connection errors, including timeouts
    Network,
    /// Configuration errors
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Credential renewal failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Get the error category for this error
    #[must_use]
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) | Self::Refresh(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }
}

/// Convert from WareflowError to ApiError
impl From<WareflowError> for ApiError {
    fn from(err: WareflowError) -> Self {
        match err {
            WareflowError::Network(msg) => Self::Network(msg),
            WareflowError::Auth(msg) => Self::Auth(msg),
            WareflowError::Config(msg) => Self::Config(msg),
            WareflowError::NotFound(msg) | WareflowError::InvalidInput(msg) => Self::Client(msg),
            WareflowError::Internal(msg) => Self::Server(msg),
        }
    }
}
