//! Shared harness: one wiremock server playing both backend hosts, a real
//! refresh coordinator backed by the auth API client, in-memory storage.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use jobportal_common::auth::{MemoryStorage, RefreshCoordinator, SessionStorage, TokenStore};
use jobportal_common::testing::fixtures;
use jobportal_domain::{format_timestamp, ApiHostsConfig, Session};
use jobportal_infra::{ApiClient, ApiClientFactory, ApiHost, AuthApiClient, HttpClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub coordinator: Arc<RefreshCoordinator>,
    pub factory: ApiClientFactory,
}

impl Harness {
    pub async fn start(session: Option<Session>) -> Self {
        let server = MockServer::start().await;
        let http = HttpClient::new().expect("http client").with_retries(1, std::time::Duration::ZERO);

        let storage = Arc::new(MemoryStorage::new());
        let store = TokenStore::new(storage.clone());
        store.write(session.as_ref()).expect("seed session");

        let backend = Arc::new(AuthApiClient::new(http.clone(), server.uri()));
        let coordinator = Arc::new(RefreshCoordinator::new(store, backend));

        let hosts =
            ApiHostsConfig { core_base_url: server.uri(), auth_base_url: server.uri() };
        let factory = ApiClientFactory::new(http, hosts, coordinator.clone());

        Self { server, storage, coordinator, factory }
    }

    pub fn core(&self) -> ApiClient {
        self.factory.create_client(ApiHost::Core, None).expect("core client")
    }

    pub fn auth(&self) -> ApiClient {
        self.factory.create_client(ApiHost::Auth, None).expect("auth client")
    }

    pub fn storage_set(&self, key: &str, value: &str) {
        self.storage.set(key, value).expect("storage write");
    }

    pub fn session(&self) -> Session {
        self.coordinator.store().read()
    }
}

/// Session whose access token looks valid locally.
pub fn session_with_token(token: &str) -> Session {
    Session { access_token: Some(token.to_string()), ..fixtures::valid_session() }
}

/// Refresh response body the auth API would send.
pub fn refresh_body(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "accessToken": access_token,
        "refreshToken": refresh_token,
        "accessTokenExpiration": format_timestamp(&(Utc::now() + Duration::hours(1))),
    })
}
