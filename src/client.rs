//! Vipps Client
//!
//! High-level client that assembles the authenticated transport stack and
//! hands out the API surfaces.

use std::sync::Arc;

use crate::core::{
    ApiClient, AuthenticatingTransport, BearerTransport, HttpTransport, ReqwestHttpTransport,
};
use crate::error::VippsResult;
use crate::flows::ClientCredentialsFlowImpl;
use crate::services::login::LoginConfig;
use crate::services::{EcomService, RecurringService};
use crate::telemetry::{Logger, TracingLogger};
use crate::token::{DefaultTokenManager, TokenManager};
use crate::types::VippsConfig;

/// Vipps API client.
///
/// Cheap to clone; clones share the token cache and the connection pool.
#[derive(Clone)]
pub struct VippsClient {
    config: Arc<VippsConfig>,
    api: Arc<ApiClient>,
    tokens: Arc<dyn TokenManager>,
}

impl VippsClient {
    /// Create a client using reqwest and logging through `tracing`.
    pub fn new(config: VippsConfig) -> VippsResult<Self> {
        let transport = match config.request_timeout {
            Some(timeout) => ReqwestHttpTransport::with_timeout(timeout)?,
            None => ReqwestHttpTransport::new()?,
        };
        Self::with_components(config, transport, Arc::new(TracingLogger))
    }

    /// Create a client from the `VIPPS_*` environment variables.
    pub fn from_env() -> VippsResult<Self> {
        Self::new(VippsConfig::from_env()?)
    }

    /// Create a client over a custom base transport and logger.
    ///
    /// API calls go through [`BearerTransport`], then [`AuthenticatingTransport`],
    /// then `transport`. Token requests skip the bearer layer but share the
    /// same [`AuthenticatingTransport`].
    pub fn with_components<T>(
        config: VippsConfig,
        transport: T,
        logger: Arc<dyn Logger>,
    ) -> VippsResult<Self>
    where
        T: HttpTransport + 'static,
    {
        let token_url = config.token_url();
        let authenticating = Arc::new(AuthenticatingTransport::new(
            transport,
            config.credentials.clone(),
            &token_url,
        )?);

        let flow = ClientCredentialsFlowImpl::new(
            token_url,
            config.token_timeout,
            authenticating.clone(),
        );
        let tokens: Arc<dyn TokenManager> = Arc::new(DefaultTokenManager::with_expiry_buffer(
            flow,
            config.expiry_buffer,
        ));

        let bearer = BearerTransport::new(authenticating, tokens.clone());
        let api = Arc::new(ApiClient::new(config.base_url(), Arc::new(bearer), logger));

        Ok(Self {
            config: Arc::new(config),
            api,
            tokens,
        })
    }

    /// Get the Vipps configuration.
    pub fn config(&self) -> &VippsConfig {
        &self.config
    }

    /// Raw API access for endpoints without a typed surface.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// E-commerce API.
    pub fn ecom(&self) -> EcomService {
        EcomService::new(self.api.clone(), self.config.merchant_serial_number.clone())
    }

    /// Recurring payments API.
    pub fn recurring(&self) -> RecurringService {
        RecurringService::new(self.api.clone())
    }

    /// Login settings for this environment.
    pub fn login(&self, redirect_url: impl Into<String>) -> LoginConfig {
        LoginConfig::new(self.config.credentials.client_id.clone(), redirect_url)
            .environment(self.config.environment)
    }

    /// Drop the cached access token; the next call fetches a new one.
    pub async fn invalidate_token(&self) {
        self.tokens.invalidate().await;
    }
}

/// Create a new Vipps client.
pub fn vipps_client(config: VippsConfig) -> VippsResult<VippsClient> {
    VippsClient::new(config)
}
