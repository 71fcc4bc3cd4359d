//! Integration tests for credential renewal through the full pipeline
//!
//! **Purpose**: Exercise the path from a 401 response → single-flight
//! credential renewal → resubmission with the renewed credential
//!
//! **Coverage:**
//! - Concurrent expired-credential requests share one refresh call
//! - Failed renewal rejects every pending request and ends the session
//! - A second 401 after renewal is final (no third attempt)
//! - Completed cycles leave room for later renewals
//! - Requests without a stored credential still renew on 401
//!
//! **Infrastructure:**
//! - WireMock HTTP server (simulates the Wareflow API)
//! - ApiClient with its real HTTP renewal endpoint

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::broadcast::error::TryRecvError;
use wareflow_client::api::ApiError;
use wareflow_client::auth::{AccessToken, RefreshError, SessionEvent};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Single-flight renewal
// ============================================================================

#[tokio::test]
async fn concurrent_expired_requests_share_one_renewal() {
    support::init_test_tracing();
    let server = MockServer::start().await;

    // Stale credential is rejected on every first attempt
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(5)
        .mount(&server)
        .await;

    // One renewal, held open long enough for every caller to join it
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(support::token_body("fresh"))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(5)
        .mount(&server)
        .await;

    let (client, store) = support::client_with_token(&server, "stale");

    let calls = (0..5).map(|_| {
        let client = Arc::clone(&client);
        async move { client.get::<serde_json::Value>("/orders").await }
    });
    let results = join_all(calls).await;

    for result in results {
        assert!(result.is_ok(), "expected success after renewal: {:?}", result.err());
    }
    assert_eq!(store.get(), Some(AccessToken::new("fresh")));
}

#[tokio::test]
async fn failed_renewal_rejects_every_pending_request() {
    support::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(5)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(500)))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = support::client_with_token(&server, "stale");
    let mut events = store.subscribe();

    let calls = (0..5).map(|_| {
        let client = Arc::clone(&client);
        async move { client.get::<serde_json::Value>("/orders").await }
    });
    let results = join_all(calls).await;

    for result in results {
        assert!(matches!(
            result.unwrap_err(),
            ApiError::Refresh(RefreshError::Rejected { status: 500 })
        ));
    }

    // Session over: store cleared, subscribers notified, nothing resubmitted
    assert!(store.get().is_none());
    assert_eq!(events.try_recv(), Ok(SessionEvent::Ended));

    let requests = server.received_requests().await.unwrap();
    let order_hits = requests.iter().filter(|r| r.url.path() == "/orders").count();
    assert_eq!(order_hits, 5);
}

// ============================================================================
// Retry finality
// ============================================================================

#[tokio::test]
async fn second_rejection_after_renewal_is_final() {
    support::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(support::token_body("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    // The renewed credential is refused as well (revoked session)
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = support::client_with_token(&server, "stale");
    let mut events = store.subscribe();

    let result = client.get::<serde_json::Value>("/orders").await;
    assert!(matches!(result.unwrap_err(), ApiError::Auth(_)));

    assert!(store.get().is_none());
    assert_eq!(events.try_recv(), Ok(SessionEvent::Ended));

    // Exactly two business attempts, never a third
    let requests = server.received_requests().await.unwrap();
    let order_hits = requests.iter().filter(|r| r.url.path() == "/orders").count();
    assert_eq!(order_hits, 2);
}

// ============================================================================
// Cycle reuse
// ============================================================================

#[tokio::test]
async fn completed_cycles_allow_later_renewals() {
    support::init_test_tracing();
    let server = MockServer::start().await;

    // Each expiry issues the next token in the sequence
    let issued = AtomicUsize::new(0);
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(move |_: &wiremock::Request| {
            let tokens = ["second", "third"];
            let index = issued.fetch_add(1, Ordering::SeqCst).min(tokens.len() - 1);
            ResponseTemplate::new(200).set_body_json(support::token_body(tokens[index]))
        })
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("Authorization", "Bearer first"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("Authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/stock"))
        .and(header("Authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/stock"))
        .and(header("Authorization", "Bearer third"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = support::client_with_token(&server, "first");

    client.get::<serde_json::Value>("/orders").await.unwrap();
    assert_eq!(store.get(), Some(AccessToken::new("second")));

    client.get::<serde_json::Value>("/stock").await.unwrap();
    assert_eq!(store.get(), Some(AccessToken::new("third")));
}

// ============================================================================
// Empty store
// ============================================================================

#[tokio::test]
async fn missing_credential_renews_on_first_rejection() {
    support::init_test_tracing();
    let server = MockServer::start().await;

    // Mounted first so the renewed attempt matches before the catch-all
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // Catch-all for the undecorated first attempt
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(support::token_body("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = support::client_without_token(&server);

    let result = client.get::<serde_json::Value>("/orders").await;
    assert!(result.is_ok(), "expected success after renewal: {:?}", result.err());
    assert_eq!(store.get(), Some(AccessToken::new("fresh")));

    let requests = server.received_requests().await.unwrap();
    let order_requests: Vec<_> = requests.iter().filter(|r| r.url.path() == "/orders").collect();
    assert_eq!(order_requests.len(), 2);
    assert!(order_requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn failed_renewal_with_empty_store_stays_silent() {
    support::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = support::client_without_token(&server);
    let mut events = store.subscribe();

    let result = client.get::<serde_json::Value>("/orders").await;
    assert!(matches!(
        result.unwrap_err(),
        ApiError::Refresh(RefreshError::Rejected { status: 401 })
    ));

    // Nothing was held, so no session-ended event fires
    assert!(store.get().is_none());
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}
