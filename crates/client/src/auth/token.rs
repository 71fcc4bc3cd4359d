//! Access token types
//!
//! The Wareflow API issues short-lived bearer tokens. They live in memory
//! only; expiry is signalled by the server with a 401 rather than tracked
//! client-side.

use std::fmt;

use serde::{Deserialize, Serialize};
use wareflow_domain::UserProfile;

/// Short-lived bearer credential for the Wareflow API
///
/// `Debug` output is redacted so token values never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value, used when building the `Authorization` header
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Body returned by the credential-issuing endpoints
/// (`/auth/login`, `/auth/register`, `/auth/refresh`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Newly issued access token
    pub access_token: String,

    /// Profile of the authenticated user (login and register only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}
