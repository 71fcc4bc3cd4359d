//! Request and response envelopes for the API pipeline
//!
//! An [`ApiRequest`] captures everything needed to (re)issue a call, so a
//! request rejected with 401 can be resubmitted unchanged after credential
//! renewal. [`ApiResponse`] buffers the body, letting the pipeline inspect
//! the status before the caller deserializes.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::ApiError;

/// A single API call, described independently of any transport attempt
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Set once the request has been resubmitted after credential renewal.
    /// A 401 on a retried request is final.
    pub(crate) retried: bool,
}

impl ApiRequest {
    /// Build a body-less request
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, retried: false }
    }

    /// Build a request carrying a JSON body
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the body cannot be serialized.
    pub fn with_json<T: Serialize>(
        method: Method,
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize body: {}", e)))?;
        Ok(Self { method, path: path.into(), body: Some(body), retried: false })
    }
}

/// A buffered API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// HTTP status of the response
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw response body
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Deserialize the body as JSON
    ///
    /// 204/205 responses deserialize as JSON `null`, so `()` and `Option`
    /// targets work without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the body cannot be parsed as `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.status == StatusCode::NO_CONTENT || self.status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Client(format!(
                    "No content response ({}), but response type cannot be deserialized from empty body",
                    self.status
                ))
            });
        }

        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::Client(format!("Failed to parse response: {}", e)))
    }

    /// Body as text, replacing invalid UTF-8
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
