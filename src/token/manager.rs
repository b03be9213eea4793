//! Token Manager
//!
//! Caches the client credentials token and refreshes it shortly before it
//! expires. Concurrent callers share one refresh.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::{VippsError, VippsResult};
use crate::flows::ClientCredentialsFlow;
use crate::types::{AccessToken, DEFAULT_EXPIRY_BUFFER};

/// Token manager interface.
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Get a valid access token, fetching a new one if the cached token is
    /// missing or about to expire.
    async fn get_access_token(&self) -> VippsResult<AccessToken>;

    /// Drop the cached token so the next call fetches a new one.
    async fn invalidate(&self);
}

/// Default token manager implementation.
pub struct DefaultTokenManager<F: ClientCredentialsFlow> {
    flow: F,
    expiry_buffer: Duration,
    cached: RwLock<Option<AccessToken>>,
}

impl<F: ClientCredentialsFlow> DefaultTokenManager<F> {
    /// Create new token manager.
    pub fn new(flow: F) -> Self {
        Self::with_expiry_buffer(flow, DEFAULT_EXPIRY_BUFFER)
    }

    /// Treat cached tokens as expired `expiry_buffer` before their expiry.
    pub fn with_expiry_buffer(flow: F, expiry_buffer: Duration) -> Self {
        Self {
            flow,
            expiry_buffer,
            cached: RwLock::new(None),
        }
    }

    fn usable(&self, cached: &Option<AccessToken>) -> Option<AccessToken> {
        cached
            .as_ref()
            .filter(|token| !token.is_expired_at(Utc::now(), self.expiry_buffer))
            .cloned()
    }
}

#[async_trait]
impl<F: ClientCredentialsFlow> TokenManager for DefaultTokenManager<F> {
    async fn get_access_token(&self) -> VippsResult<AccessToken> {
        if let Some(token) = self.usable(&*self.cached.read().await) {
            return Ok(token);
        }

        let mut cached = self.cached.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = self.usable(&cached) {
            return Ok(token);
        }

        let response = self.flow.request_token().await?;
        let token = AccessToken::from_response(response, Utc::now());
        tracing::debug!(expires_at = ?token.expires_at, "Fetched access token");

        *cached = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

/// Mock token manager for testing.
#[derive(Default)]
pub struct MockTokenManager {
    next_access_token: Mutex<Option<String>>,
    next_error: Mutex<Option<VippsError>>,
    calls: Mutex<usize>,
}

impl MockTokenManager {
    /// Create new mock token manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token returned from now on.
    pub fn set_next_access_token(&self, token: impl Into<String>) -> &Self {
        *self.next_access_token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
        self
    }

    /// Fail the next call with `error`.
    pub fn set_next_error(&self, error: VippsError) -> &Self {
        *self.next_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TokenManager for MockTokenManager {
    async fn get_access_token(&self) -> VippsResult<AccessToken> {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        if let Some(error) = self
            .next_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            return Err(error);
        }

        let value = self
            .next_access_token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .unwrap_or_else(|| "mock-access-token".to_string());
        Ok(AccessToken::new(value, "Bearer".to_string(), None))
    }

    async fn invalidate(&self) {}
}

/// Create mock token manager for testing.
pub fn create_mock_token_manager() -> MockTokenManager {
    MockTokenManager::new()
}
