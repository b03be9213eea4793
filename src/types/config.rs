//! Configuration Types
//!
//! Credentials, target environment and client configuration.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigurationError, VippsError};

/// Base URL of the Vipps test environment.
pub const BASE_URL_TESTING: &str = "https://apitest.vipps.no";
/// Base URL of the Vipps production environment.
pub const BASE_URL_PRODUCTION: &str = "https://api.vipps.no";
/// Path of the access token endpoint, relative to the base URL.
pub const TOKEN_ENDPOINT_PATH: &str = "/accessToken/get";

/// Deadline applied to every token request.
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(20);
/// Cached tokens are treated as expired this long before their expiry.
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::from_secs(10);

/// Vipps environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Testing,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Testing => BASE_URL_TESTING,
            Self::Production => BASE_URL_PRODUCTION,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testing => "testing",
            Self::Production => "production",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = VippsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" | "testing" => Ok(Self::Testing),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(VippsError::Configuration(
                ConfigurationError::UnknownEnvironment {
                    value: s.to_string(),
                },
            )),
        }
    }
}

/// Credentials issued to a Vipps merchant.
#[derive(Clone)]
pub struct Credentials {
    /// Client identifier.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
    /// API gateway subscription key, sent with every request.
    pub subscription_key: SecretString,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        subscription_key: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            subscription_key: SecretString::new(subscription_key.into()),
        }
    }

    pub(crate) fn expose_client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    pub(crate) fn expose_subscription_key(&self) -> &str {
        self.subscription_key.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("subscription_key", &"[REDACTED]")
            .finish()
    }
}

/// Vipps client configuration.
#[derive(Clone, Debug)]
pub struct VippsConfig {
    /// Target environment.
    pub environment: Environment,
    /// Merchant credentials.
    pub credentials: Credentials,
    /// Merchant serial number, required by the e-commerce API.
    pub merchant_serial_number: Option<String>,
    /// Overrides the environment's base URL (proxies, local test servers).
    pub base_url: Option<String>,
    /// Fixed deadline for token requests.
    pub token_timeout: Duration,
    /// Refresh tokens this long before they expire.
    pub expiry_buffer: Duration,
    /// Timeout applied to API calls by the default HTTP transport. `None`
    /// leaves calls unbounded; token requests keep their own deadline.
    pub request_timeout: Option<Duration>,
}

impl VippsConfig {
    pub fn new(environment: Environment, credentials: Credentials) -> Self {
        Self {
            environment,
            credentials,
            merchant_serial_number: None,
            base_url: None,
            token_timeout: DEFAULT_TOKEN_TIMEOUT,
            expiry_buffer: DEFAULT_EXPIRY_BUFFER,
            request_timeout: None,
        }
    }

    /// Base URL requests are resolved against, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }

    /// Full URL of the access token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url(), TOKEN_ENDPOINT_PATH)
    }
}
