#![allow(dead_code)]

use std::sync::Arc;

use uruti::auth::{MemorySessionStore, SessionStore, StorageKey};
use uruti::client::ApiClient;
use uruti::config::ClientConfig;
use wiremock::MockServer;

pub struct TestClient {
    pub client: ApiClient,
    pub store: Arc<MemorySessionStore>,
}

impl TestClient {
    pub fn stored(&self, key: StorageKey) -> Option<String> {
        self.store.get_key(key).expect("memory store never fails")
    }

    pub fn seed(&self, key: StorageKey, value: &str) {
        self.store
            .set_key(key, value)
            .expect("memory store never fails");
    }
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri())
}

pub fn client_for(server: &MockServer) -> TestClient {
    client_with_config(config_for(server))
}

pub fn client_with_config(config: ClientConfig) -> TestClient {
    let store = Arc::new(MemorySessionStore::new());
    let client = ApiClient::with_store(config, store.clone()).expect("client should build");
    TestClient { client, store }
}

/// Client whose store already holds an access token and, optionally, a refresh token.
pub fn logged_in_client(server: &MockServer, token: &str, refresh: Option<&str>) -> TestClient {
    let test = client_for(server);
    test.seed(StorageKey::AuthToken, token);
    if let Some(refresh) = refresh {
        test.seed(StorageKey::RefreshToken, refresh);
    }
    test
}
