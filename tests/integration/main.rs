//! Integration tests using WireMock
//!
//! These tests run the complete client against a mock Vipps server: token
//! acquisition, header injection, request logging and error translation.

pub mod auth_pipeline;
pub mod concurrency;
pub mod errors;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use integrations_vipps::{
    vipps_config, Logger, NoOpLogger, ReqwestHttpTransport, VippsClient, VippsConfig,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN_PATH: &str = "/accessToken/get";
pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const SUBSCRIPTION_KEY: &str = "test-subscription-key";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Configuration pointing at the mock server
pub fn test_config(server: &MockServer) -> VippsConfig {
    vipps_config()
        .client_id(CLIENT_ID)
        .client_secret(CLIENT_SECRET)
        .subscription_key(SUBSCRIPTION_KEY)
        .merchant_serial_number("123456")
        .base_url(server.uri())
        .build()
        .expect("valid test config")
}

/// Client over a real reqwest transport
pub fn test_client(server: &MockServer) -> VippsClient {
    test_client_with_logger(server, Arc::new(NoOpLogger))
}

pub fn test_client_with_logger(server: &MockServer, logger: Arc<dyn Logger>) -> VippsClient {
    let transport = ReqwestHttpTransport::new().expect("transport");
    VippsClient::with_components(test_config(server), transport, logger).expect("client")
}

/// Issues `token-1`, `token-2`, ... with the given `expires_in`.
pub struct TokenResponder {
    issued: AtomicUsize,
    expires_in: &'static str,
}

impl TokenResponder {
    pub fn new(expires_in: &'static str) -> Self {
        Self {
            issued: AtomicUsize::new(0),
            expires_in,
        }
    }
}

impl Respond for TokenResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": self.expires_in,
            "ext_expires_in": self.expires_in,
            "resource": "00000002-0000-0000-c000-000000000000",
            "access_token": format!("token-{}", n)
        }))
    }
}

/// Mount the token endpoint
pub async fn mount_token_endpoint(server: &MockServer, expires_in: &'static str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(TokenResponder::new(expires_in))
        .mount(server)
        .await;
}

/// Number of requests the server received for `request_path`
pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == request_path)
        .collect()
}
