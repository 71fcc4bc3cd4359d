//! API client with single-retry authentication pipeline
//!
//! Provides the HTTP-based API client for domain operations with automatic
//! bearer decoration, single-flight credential renewal, and exactly one
//! resubmission after an expired-credential 401.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument};
use wareflow_domain::ApiConfig;

use super::errors::ApiError;
use super::request::{ApiRequest, ApiResponse};
use crate::auth::exempt::is_exempt;
use crate::auth::refresh::{HttpRefreshEndpoint, RefreshCoordinator, RefreshEndpoint};
use crate::auth::store::CredentialStore;
use crate::http::HttpClient;

/// API client for the Wareflow backend
///
/// All traffic flows through [`ApiClient::execute`]; the typed helpers
/// ([`get`](Self::get), [`post`](Self::post), ...) are thin wrappers over
/// it. The client shares one credential store and one renewal coordinator
/// across clones of its `Arc`, so concurrent calls hitting an expired
/// credential trigger a single refresh.
pub struct ApiClient {
    http_client: Arc<HttpClient>,
    store: Arc<CredentialStore>,
    coordinator: Arc<RefreshCoordinator>,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a client from configuration with default wiring
    ///
    /// # Arguments
    ///
    /// * `config` - Client configuration
    ///
    /// # Returns
    ///
    /// Configured API client with a fresh credential store
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Self::builder().config(config).build()
    }

    /// Create a builder for fluent configuration
    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Credential store shared by this client
    #[must_use]
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Run a request through the full pipeline
    ///
    /// The request is decorated with the stored bearer token (unless its
    /// path is exempt), submitted, and resubmitted exactly once if the
    /// first attempt came back 401 and credential renewal succeeded. A 401
    /// on the resubmission is final: the store is cleared and the error
    /// propagates.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for non-success statuses, transport
    /// failures, timeouts, and failed credential renewal
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.submit(&request).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && !request.retried
            && !is_exempt(&request.path)
        {
            return self.retry_once(request).await;
        }

        self.resolve(response, &request)
    }

    /// Execute a GET request
    ///
    /// # Arguments
    ///
    /// * `path` - API path (e.g., "/orders")
    ///
    /// # Returns
    ///
    /// Deserialized response
    ///
    /// # Errors
    ///
    /// Returns error if request fails or response cannot be deserialized
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(ApiRequest::new(Method::GET, path)).await?;
        let result = response.json()?;

        info!(path = %path, "GET request successful");
        Ok(result)
    }

    /// Execute a POST request
    ///
    /// # Arguments
    ///
    /// * `path` - API path
    /// * `body` - Request body
    ///
    /// # Returns
    ///
    /// Deserialized response
    ///
    /// # Errors
    ///
    /// Returns error if request fails or response cannot be deserialized
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let request = ApiRequest::with_json(Method::POST, path, body)?;
        let response = self.execute(request).await?;
        let result = response.json()?;

        info!(path = %path, "POST request successful");
        Ok(result)
    }

    /// Execute a PUT request
    ///
    /// # Errors
    ///
    /// Returns error if request fails or response cannot be deserialized
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let request = ApiRequest::with_json(Method::PUT, path, body)?;
        let response = self.execute(request).await?;
        let result = response.json()?;

        info!(path = %path, "PUT request successful");
        Ok(result)
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    ///
    /// Returns error if request fails or response cannot be deserialized
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(ApiRequest::new(Method::DELETE, path)).await?;
        let result = response.json()?;

        info!(path = %path, "DELETE request successful");
        Ok(result)
    }

    /// Issue one transport attempt for the request
    async fn submit(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.request_url(&request.path);
        let timeout = Duration::from_secs(self.config.timeout_seconds);

        debug!(url = %url, "submitting request");

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .header("Content-Type", "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let builder = self.decorate(builder, &request.path);

        let response = match tokio::time::timeout(timeout, self.http_client.send(builder)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(ApiError::from(err)),
            Err(_) => return Err(ApiError::Timeout(timeout)),
        };

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }

    /// Attach the stored bearer token unless the path is exempt
    fn decorate(&self, builder: RequestBuilder, path: &str) -> RequestBuilder {
        if is_exempt(path) {
            return builder;
        }

        match self.store.get() {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token.as_str())),
            None => builder,
        }
    }

    /// Renew the credential, then resubmit the request once
    async fn retry_once(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(path = %request.path, "credential rejected, renewing before resubmission");
        request.retried = true;

        self.coordinator.renew().await?;

        let response = self.submit(&request).await?;
        self.resolve(response, &request)
    }

    /// Turn the buffered response into the pipeline's final answer
    fn resolve(&self, response: ApiResponse, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && request.retried && !is_exempt(&request.path) {
            // The freshly renewed credential was rejected as well; the
            // session is over for reasons a second renewal cannot fix.
            self.store.clear();
        }

        let url = self.request_url(&request.path);
        Err(Self::map_status_error(status, &url, response.text()))
    }

    fn request_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn map_status_error(status: StatusCode, url: &str, body: String) -> ApiError {
        let message = if body.is_empty() {
            format!("{} returned status {}", url, status)
        } else {
            format!("{} returned status {}: {}", url, status, body)
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiError::Auth(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            ApiError::RateLimit(message)
        } else if status.is_server_error() {
            ApiError::Server(message)
        } else if status.is_client_error() {
            ApiError::Client(message)
        } else {
            ApiError::Network(message)
        }
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiConfig>,
    store: Option<Arc<CredentialStore>>,
    refresh_endpoint: Option<Arc<dyn RefreshEndpoint>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing credential store
    #[must_use]
    pub fn store(mut self, store: Arc<CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the credential renewal endpoint
    #[must_use]
    pub fn refresh_endpoint(mut self, endpoint: Arc<dyn RefreshEndpoint>) -> Self {
        self.refresh_endpoint = Some(endpoint);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the HTTP client cannot be created
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;
        let http_client = Arc::new(http_client);

        let store = self.store.unwrap_or_else(|| Arc::new(CredentialStore::new()));
        let endpoint = self.refresh_endpoint.unwrap_or_else(|| {
            Arc::new(HttpRefreshEndpoint::new(Arc::clone(&http_client), &config.base_url))
        });
        let coordinator = Arc::new(RefreshCoordinator::new(endpoint, Arc::clone(&store)));

        Ok(ApiClient { http_client, store, coordinator, config })
    }
}
