//! Client Credentials Flow
//!
//! RFC 6749 Section 4.4 - Client Credentials Grant, as served by the Vipps
//! access token endpoint.
//!
//! The endpoint authenticates with `client_id`/`client_secret` headers rather
//! than HTTP Basic or form parameters. Those headers are added by
//! [`AuthenticatingTransport`](crate::core::AuthenticatingTransport), so the
//! transport given to [`ClientCredentialsFlowImpl`] is expected to be one.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Mutex;
use std::time::Duration;

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{TokenError, VippsError, VippsResult};
use crate::types::TokenResponse;

const GRANT_BODY: &str = "grant_type=client_credentials";

/// Client Credentials Flow interface.
#[async_trait]
pub trait ClientCredentialsFlow: Send + Sync {
    /// Request a new access token.
    async fn request_token(&self) -> VippsResult<TokenResponse>;
}

/// Client Credentials Flow implementation.
pub struct ClientCredentialsFlowImpl<T: HttpTransport> {
    token_url: String,
    timeout: Duration,
    transport: T,
}

impl<T: HttpTransport> ClientCredentialsFlowImpl<T> {
    /// Create new Client Credentials Flow. Every token request must complete
    /// within `timeout`.
    pub fn new(token_url: impl Into<String>, timeout: Duration, transport: T) -> Self {
        Self {
            token_url: token_url.into(),
            timeout,
            transport,
        }
    }

    fn build_request(&self) -> VippsResult<HttpRequest> {
        let mut request = HttpRequest::new(HttpMethod::Post, self.token_url.clone());
        request.set_header("content-type", "application/x-www-form-urlencoded")?;
        request.set_header("accept", "application/json")?;
        request.body = Some(Bytes::from_static(GRANT_BODY.as_bytes()));
        request.timeout = Some(self.timeout);
        Ok(request)
    }
}

#[async_trait]
impl<T: HttpTransport> ClientCredentialsFlow for ClientCredentialsFlowImpl<T> {
    async fn request_token(&self) -> VippsResult<TokenResponse> {
        let request = self.build_request()?;

        let response = match tokio::time::timeout(self.timeout, self.transport.send(request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(source)) => {
                return Err(VippsError::Token(TokenError::Request {
                    source: Box::new(source),
                }))
            }
            Err(_) => {
                return Err(VippsError::Token(TokenError::Timeout {
                    timeout: self.timeout,
                }))
            }
        };

        if !response.is_success() {
            return Err(VippsError::Token(TokenError::Rejected {
                status: response.status,
                body: response.body,
            }));
        }

        let token_response: TokenResponse =
            serde_json::from_slice(&response.body).map_err(|e| {
                VippsError::Token(TokenError::InvalidResponse {
                    message: e.to_string(),
                })
            })?;

        if token_response.access_token.is_empty() {
            return Err(VippsError::Token(TokenError::InvalidResponse {
                message: "server response missing access_token".to_string(),
            }));
        }

        Ok(token_response)
    }
}

/// Mock Client Credentials Flow for testing.
///
/// Issues `mock-token-1`, `mock-token-2`, ... unless an error is queued.
#[derive(Default)]
pub struct MockClientCredentialsFlow {
    calls: Mutex<usize>,
    expires_in: Mutex<Option<u64>>,
    next_error: Mutex<Option<VippsError>>,
}

impl MockClientCredentialsFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifetime, in seconds, of the tokens issued from now on.
    pub fn set_expires_in(&self, expires_in: Option<u64>) -> &Self {
        *self.expires_in.lock().unwrap_or_else(|e| e.into_inner()) = expires_in;
        self
    }

    /// Fail the next token request with `error`.
    pub fn set_next_error(&self, error: VippsError) -> &Self {
        *self.next_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
        self
    }

    /// Number of token requests made so far.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ClientCredentialsFlow for MockClientCredentialsFlow {
    async fn request_token(&self) -> VippsResult<TokenResponse> {
        let n = {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            *calls += 1;
            *calls
        };

        if let Some(error) = self
            .next_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            return Err(error);
        }

        Ok(TokenResponse {
            access_token: format!("mock-token-{}", n),
            token_type: "Bearer".to_string(),
            expires_in: *self.expires_in.lock().unwrap_or_else(|e| e.into_inner()),
            extra: Default::default(),
        })
    }
}

/// Create mock client credentials flow for testing.
pub fn create_mock_client_credentials_flow() -> MockClientCredentialsFlow {
    MockClientCredentialsFlow::new()
}
