#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use topcoin_common::MemoryCredentialStore;
use topcoin_domain::ClientConfig;
use topcoin_infra::ApiClient;
use wiremock::MockServer;

pub const REALTIME_BASE: &str = "ws://localhost:8000";

/// Client pointed at `server` plus a handle on its backing store.
pub struct TestClient {
    pub client: ApiClient,
    pub store: MemoryCredentialStore,
}

/// Build a client over an in-memory store seeded with the given tokens.
pub fn client_with_tokens(server: &MockServer, access: &str, refresh: &str) -> TestClient {
    build(server, MemoryCredentialStore::with_tokens(access, refresh))
}

/// Build a client over an empty in-memory store.
pub fn signed_out_client(server: &MockServer) -> TestClient {
    build(server, MemoryCredentialStore::new())
}

/// Build a client whose API origin refuses connections.
pub fn unreachable_client(access: &str, refresh: &str) -> TestClient {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    build_for(format!("http://{}", addr), MemoryCredentialStore::with_tokens(access, refresh))
}

fn build(server: &MockServer, store: MemoryCredentialStore) -> TestClient {
    build_for(server.uri(), store)
}

fn build_for(api_base_url: String, store: MemoryCredentialStore) -> TestClient {
    let config = ClientConfig::new(api_base_url, REALTIME_BASE);
    let client = ApiClient::new(config, Arc::new(store.clone())).expect("client should build");
    TestClient { client, store }
}
