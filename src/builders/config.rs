//! Configuration Builder
//!
//! Fluent builder for Vipps configuration, and loading it from the
//! environment.

use std::time::Duration;

use crate::error::{ConfigurationError, VippsError, VippsResult};
use crate::types::{
    Credentials, Environment, VippsConfig, DEFAULT_EXPIRY_BUFFER, DEFAULT_TOKEN_TIMEOUT,
};

pub const ENV_CLIENT_ID: &str = "VIPPS_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "VIPPS_CLIENT_SECRET";
pub const ENV_SUBSCRIPTION_KEY: &str = "VIPPS_SUBSCRIPTION_KEY";
/// `test`, `testing`, `prod` or `production`.
pub const ENV_ENVIRONMENT: &str = "VIPPS_ENVIRONMENT";
pub const ENV_MERCHANT_SERIAL_NUMBER: &str = "VIPPS_MERCHANT_SERIAL_NUMBER";
pub const ENV_BASE_URL: &str = "VIPPS_BASE_URL";

/// Vipps configuration builder.
pub struct VippsConfigBuilder {
    environment: Environment,
    client_id: Option<String>,
    client_secret: Option<String>,
    subscription_key: Option<String>,
    merchant_serial_number: Option<String>,
    base_url: Option<String>,
    token_timeout: Duration,
    expiry_buffer: Duration,
    request_timeout: Option<Duration>,
}

impl Default for VippsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VippsConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            environment: Environment::default(),
            client_id: None,
            client_secret: None,
            subscription_key: None,
            merchant_serial_number: None,
            base_url: None,
            token_timeout: DEFAULT_TOKEN_TIMEOUT,
            expiry_buffer: DEFAULT_EXPIRY_BUFFER,
            request_timeout: None,
        }
    }

    /// Seed a builder from `lookup`, called with the `VIPPS_*` variable
    /// names. Unset or empty variables leave the field unset.
    pub fn from_lookup<F>(lookup: F) -> VippsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = Self::new();
        if let Some(environment) = get(ENV_ENVIRONMENT) {
            builder.environment = environment.parse()?;
        }
        builder.client_id = get(ENV_CLIENT_ID);
        builder.client_secret = get(ENV_CLIENT_SECRET);
        builder.subscription_key = get(ENV_SUBSCRIPTION_KEY);
        builder.merchant_serial_number = get(ENV_MERCHANT_SERIAL_NUMBER);
        builder.base_url = get(ENV_BASE_URL);
        Ok(builder)
    }

    /// Seed a builder from the process environment.
    pub fn from_env() -> VippsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Set target environment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set API subscription key.
    pub fn subscription_key(mut self, subscription_key: impl Into<String>) -> Self {
        self.subscription_key = Some(subscription_key.into());
        self
    }

    /// Set all three credentials at once.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        use secrecy::ExposeSecret;
        self.client_secret = Some(credentials.client_secret.expose_secret().clone());
        self.subscription_key = Some(credentials.subscription_key.expose_secret().clone());
        self.client_id = Some(credentials.client_id);
        self
    }

    /// Set merchant serial number.
    pub fn merchant_serial_number(mut self, msn: impl Into<String>) -> Self {
        self.merchant_serial_number = Some(msn.into());
        self
    }

    /// Override the environment's base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set token request deadline.
    pub fn token_timeout(mut self, timeout: Duration) -> Self {
        self.token_timeout = timeout;
        self
    }

    /// Set how long before expiry a cached token is refreshed.
    pub fn expiry_buffer(mut self, buffer: Duration) -> Self {
        self.expiry_buffer = buffer;
        self
    }

    /// Bound API calls made through the default transport by `timeout`.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the Vipps configuration.
    pub fn build(self) -> VippsResult<VippsConfig> {
        let missing = |field: &str| {
            VippsError::Configuration(ConfigurationError::MissingField {
                field: field.to_string(),
            })
        };

        let client_id = self.client_id.ok_or_else(|| missing("client_id"))?;
        let client_secret = self.client_secret.ok_or_else(|| missing("client_secret"))?;
        let subscription_key = self
            .subscription_key
            .ok_or_else(|| missing("subscription_key"))?;

        if let Some(base_url) = &self.base_url {
            let parsed = url::Url::parse(base_url).map_err(|e| {
                VippsError::Configuration(ConfigurationError::InvalidUrl {
                    url: base_url.clone(),
                    message: e.to_string(),
                })
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(VippsError::Configuration(ConfigurationError::InvalidUrl {
                    url: base_url.clone(),
                    message: "scheme must be http or https".to_string(),
                }));
            }
        }

        let mut config = VippsConfig::new(
            self.environment,
            Credentials::new(client_id, client_secret, subscription_key),
        );
        config.merchant_serial_number = self.merchant_serial_number;
        config.base_url = self.base_url;
        config.token_timeout = self.token_timeout;
        config.expiry_buffer = self.expiry_buffer;
        config.request_timeout = self.request_timeout;
        Ok(config)
    }
}

impl VippsConfig {
    /// Create a new configuration builder.
    pub fn builder() -> VippsConfigBuilder {
        VippsConfigBuilder::new()
    }

    /// Load configuration from the `VIPPS_*` environment variables.
    pub fn from_env() -> VippsResult<Self> {
        VippsConfigBuilder::from_env()?.build()
    }
}

/// Create a new Vipps configuration builder.
pub fn vipps_config() -> VippsConfigBuilder {
    VippsConfigBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builder_success() {
        let config = vipps_config()
            .client_id("client")
            .client_secret("secret")
            .subscription_key("key")
            .environment(Environment::Production)
            .merchant_serial_number("123456")
            .build()
            .unwrap();

        assert_eq!(config.credentials.client_id, "client");
        assert_eq!(config.merchant_serial_number.as_deref(), Some("123456"));
        assert_eq!(config.base_url(), "https://api.vipps.no");
        assert_eq!(config.token_timeout, Duration::from_secs(20));
        assert_eq!(config.expiry_buffer, Duration::from_secs(10));
        assert_eq!(config.request_timeout, None);

        let config = vipps_config()
            .credentials(Credentials::new("id", "secret", "key"))
            .request_timeout(Duration::from_secs(45))
            .build()
            .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_builder_missing_subscription_key() {
        let result = vipps_config()
            .client_id("client")
            .client_secret("secret")
            .build();

        match result {
            Err(VippsError::Configuration(ConfigurationError::MissingField { field })) => {
                assert_eq!(field, "subscription_key");
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_invalid_base_url() {
        let result = vipps_config()
            .credentials(Credentials::new("id", "secret", "key"))
            .base_url("ftp://example.com")
            .build();
        assert!(matches!(
            result,
            Err(VippsError::Configuration(ConfigurationError::InvalidUrl { .. }))
        ));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_CLIENT_ID, "env-client"),
            (ENV_CLIENT_SECRET, "env-secret"),
            (ENV_SUBSCRIPTION_KEY, "env-key"),
            (ENV_ENVIRONMENT, "prod"),
            (ENV_BASE_URL, "http://127.0.0.1:8080"),
            (ENV_MERCHANT_SERIAL_NUMBER, ""),
        ]
        .into_iter()
        .collect();

        let config = VippsConfigBuilder::from_lookup(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.token_url(), "http://127.0.0.1:8080/accessToken/get");
        assert!(config.merchant_serial_number.is_none());
    }

    #[test]
    fn test_from_lookup_unknown_environment() {
        let result = VippsConfigBuilder::from_lookup(|k| {
            (k == ENV_ENVIRONMENT).then(|| "staging".to_string())
        });
        assert!(matches!(
            result,
            Err(VippsError::Configuration(ConfigurationError::UnknownEnvironment { .. }))
        ));
    }
}
