//! Single-flight credential renewal
//!
//! Many concurrent requests can discover an expired credential at the same
//! time. The coordinator guarantees that only one renewal call reaches the
//! server per expiry: the first caller starts a renewal cycle, callers
//! arriving while it is in flight subscribe to that cycle, and the single
//! outcome is broadcast to every waiter at once.
//!
//! Ordering inside a cycle, identical for the success and failure arm:
//! 1. the credential store is updated,
//! 2. the in-flight slot is vacated,
//! 3. the outcome is broadcast.
//!
//! Waiters therefore always observe the store in its post-renewal state,
//! and a caller arriving after the broadcast finds the slot empty and
//! starts a genuinely new cycle.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use wareflow_domain::constants::AUTH_REFRESH_PATH;

use super::store::CredentialStore;
use super::token::{AccessToken, TokenResponse};
use crate::http::HttpClient;

/// Result shared by every caller of one renewal cycle
pub type RefreshOutcome = Result<AccessToken, RefreshError>;

/// Why a renewal cycle failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The server refused to issue a new credential, e.g. because the
    /// ambient session itself has expired.
    #[error("renewal rejected with status {status}")]
    Rejected { status: u16 },

    /// The renewal call never produced a response.
    #[error("renewal request failed: {0}")]
    Network(String),

    /// The server answered with success but the body was not a usable token.
    #[error("invalid renewal response: {0}")]
    InvalidResponse(String),
}

/// Server operation exchanging the ambient session for a fresh token
///
/// The seam exists for dependency injection: production uses
/// [`HttpRefreshEndpoint`], tests substitute controllable mocks.
#[async_trait]
pub trait RefreshEndpoint: Send + Sync {
    /// Request exactly one new access token
    async fn renew_token(&self) -> Result<AccessToken, RefreshError>;
}

/// Serializes credential renewal across concurrent callers
pub struct RefreshCoordinator {
    endpoint: Arc<dyn RefreshEndpoint>,
    store: Arc<CredentialStore>,
    in_flight: Arc<Mutex<Option<broadcast::Sender<RefreshOutcome>>>>,
}

impl RefreshCoordinator {
    /// Create a coordinator bound to a renewal endpoint and the store the
    /// renewed credential is published to
    #[must_use]
    pub fn new(endpoint: Arc<dyn RefreshEndpoint>, store: Arc<CredentialStore>) -> Self {
        Self { endpoint, store, in_flight: Arc::new(Mutex::new(None)) }
    }

    /// Obtain a freshly renewed credential
    ///
    /// If a renewal is already in flight the caller joins it and receives
    /// the same outcome as every other waiter. Otherwise a new cycle is
    /// started. Either way, exactly one renewal request reaches the server
    /// per cycle.
    pub async fn renew(&self) -> RefreshOutcome {
        let mut receiver = {
            // No await happens while this lock is held; the check-and-create
            // below is one atomic step even under a cooperative scheduler.
            let mut slot = self.in_flight.lock();
            match slot.as_ref() {
                Some(sender) => {
                    debug!("joining in-flight credential renewal");
                    sender.subscribe()
                }
                None => {
                    debug!("starting credential renewal cycle");
                    let (sender, receiver) = broadcast::channel(1);
                    *slot = Some(sender);
                    self.spawn_cycle();
                    receiver
                }
            }
        };

        match receiver.recv().await {
            Ok(outcome) => outcome,
            Err(_) => Err(RefreshError::Network("renewal ended without an outcome".to_string())),
        }
    }

    /// Run one renewal cycle as a detached task
    ///
    /// Spawning decouples the cycle from its callers: once started, the
    /// renewal runs to completion even if every waiter is dropped.
    fn spawn_cycle(&self) {
        let endpoint = Arc::clone(&self.endpoint);
        let store = Arc::clone(&self.store);
        let in_flight = Arc::clone(&self.in_flight);

        tokio::spawn(async move {
            let outcome = endpoint.renew_token().await;

            match &outcome {
                Ok(token) => {
                    store.set(token.clone());
                    info!("credential renewed");
                }
                Err(error) => {
                    warn!(%error, "credential renewal failed");
                    store.clear();
                }
            }

            // Vacate the slot before publishing: anyone arriving after the
            // broadcast must start a new cycle instead of joining a
            // finished one.
            let sender = in_flight.lock().take();
            if let Some(sender) = sender {
                let _ = sender.send(outcome);
            }
        });
    }
}

/// Production renewal endpoint backed by the shared HTTP transport
///
/// Issues `POST {base_url}/auth/refresh` with an empty body. The holder's
/// session travels in the cookie jar shared with the rest of the client,
/// so no payload is needed.
pub struct HttpRefreshEndpoint {
    http_client: Arc<HttpClient>,
    refresh_url: String,
}

impl HttpRefreshEndpoint {
    /// Create an endpoint for the given API base URL
    #[must_use]
    pub fn new(http_client: Arc<HttpClient>, base_url: &str) -> Self {
        Self { http_client, refresh_url: format!("{}{}", base_url, AUTH_REFRESH_PATH) }
    }
}

#[async_trait]
impl RefreshEndpoint for HttpRefreshEndpoint {
    #[instrument(skip(self))]
    async fn renew_token(&self) -> Result<AccessToken, RefreshError> {
        let request = self.http_client.request(Method::POST, &self.refresh_url);
        let response = self
            .http_client
            .send(request)
            .await
            .map_err(|err| RefreshError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "renewal rejected by server");
            return Err(RefreshError::Rejected { status: status.as_u16() });
        }

        let body: TokenResponse =
            response.json().await.map_err(|err| RefreshError::InvalidResponse(err.to_string()))?;

        Ok(AccessToken::new(body.access_token))
    }
}
