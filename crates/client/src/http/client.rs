use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use wareflow_domain::WareflowError;

/// HTTP client with timeout, user agent, and cookie support.
///
/// The cookie jar is always enabled: the ambient session used by the
/// credential renewal endpoint travels as a cookie, so every call made
/// through this client shares one jar.
///
/// This layer performs exactly one attempt per [`send`](Self::send) call.
/// Reissuing a request is an api-layer decision tied to credential renewal,
/// not a transport concern.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, WareflowError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    ///
    /// Returns the response whatever its status code; HTTP-level failures
    /// (4xx/5xx) are not errors at this layer.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, WareflowError> {
        let request = builder.build().map_err(map_reqwest_error)?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(map_reqwest_error(err))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), user_agent: None, default_headers: None }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, WareflowError> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).cookie_store(true).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(map_reqwest_error)?;

        Ok(HttpClient { client })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> WareflowError {
    if err.is_timeout() {
        WareflowError::Network(format!("HTTP request timed out: {err}"))
    } else if err.is_connect() || err.is_request() {
        WareflowError::Network(format!("HTTP request failed: {err}"))
    } else {
        WareflowError::Internal(format!("HTTP client error: {err}"))
    }
}
