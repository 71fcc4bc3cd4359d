use std::sync::Arc;

use wareflow_client::api::ApiClient;
use wareflow_client::auth::{AccessToken, CredentialStore};
use wareflow_domain::ApiConfig;
use wiremock::MockServer;

/// Install a tracing subscriber wired to the test writer (idempotent).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("wareflow_client=debug")
        .with_test_writer()
        .try_init();
}

/// Config pointing at the mock server with a short timeout.
pub fn test_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
        user_agent: "wareflow-tests".to_string(),
    }
}

/// Build a client against the mock server with `token` already stored.
///
/// The client keeps its real HTTP renewal endpoint, so mounting a
/// `POST /auth/refresh` mock on the server drives credential renewal.
pub fn client_with_token(
    server: &MockServer,
    token: &str,
) -> (Arc<ApiClient>, Arc<CredentialStore>) {
    let store = Arc::new(CredentialStore::new());
    store.set(AccessToken::new(token));
    (build_client(server, Arc::clone(&store)), store)
}

/// Build a client with an empty credential store.
pub fn client_without_token(server: &MockServer) -> (Arc<ApiClient>, Arc<CredentialStore>) {
    let store = Arc::new(CredentialStore::new());
    (build_client(server, Arc::clone(&store)), store)
}

fn build_client(server: &MockServer, store: Arc<CredentialStore>) -> Arc<ApiClient> {
    let client = ApiClient::builder()
        .config(test_config(server))
        .store(store)
        .build()
        .expect("client should build");
    Arc::new(client)
}

/// JSON body issued by the token endpoints.
pub fn token_body(token: &str) -> serde_json::Value {
    serde_json::json!({ "access_token": token })
}
