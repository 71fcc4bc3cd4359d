//! In-memory credential store
//!
//! Single authority for the current access token. Reads and writes use a
//! synchronous lock, so no lock is ever held across an await point.
//! Clearing a stored credential announces the end of the session on a
//! broadcast channel for interested subsystems (UI, background workers).

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};
use wareflow_domain::constants::SESSION_EVENT_CHANNEL_CAPACITY;

use super::token::AccessToken;

/// Session lifecycle notifications emitted by [`CredentialStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The credential was removed; the session is over until a new login
    /// or a successful renewal.
    Ended,
}

/// Thread-safe owner of the current access token
pub struct CredentialStore {
    token: RwLock<Option<AccessToken>>,
    events: broadcast::Sender<SessionEvent>,
}

impl CredentialStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENT_CHANNEL_CAPACITY);
        Self { token: RwLock::new(None), events }
    }

    /// Current token, if any
    #[must_use]
    pub fn get(&self) -> Option<AccessToken> {
        self.token.read().clone()
    }

    /// Replace the stored token
    ///
    /// Requests already in flight keep whatever credential they were built
    /// with; only requests decorated after this call observe the new value.
    pub fn set(&self, token: AccessToken) {
        *self.token.write() = Some(token);
        debug!("access credential updated");
    }

    /// Remove the stored token
    ///
    /// Emits [`SessionEvent::Ended`] when a credential was actually present.
    /// Clearing an already-empty store is a no-op and emits nothing.
    pub fn clear(&self) {
        let removed = self.token.write().take().is_some();
        if removed {
            info!("session ended, credential cleared");
            let _ = self.events.send(SessionEvent::Ended);
        }
    }

    /// Whether a credential is currently stored
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Subscribe to session lifecycle events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
