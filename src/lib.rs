//! Vipps Integration Module
//!
//! Client for the Vipps payment APIs: client-credentials authentication,
//! subscription-key headers, structured request logging and typed API errors.
//!
//! # Features
//!
//! - Client Credentials token with caching and refresh before expiry
//! - `Ocp-Apim-Subscription-Key` on every request
//! - E-commerce payments (eCom v2)
//! - Recurring payment agreements and charges (Recurring v2)
//! - Vipps Login authorization URL and claim types
//! - Structured errors per API surface
//!
//! # Example
//!
//! ```rust,ignore
//! use integrations_vipps::{vipps_config, Environment, RecurringServiceTrait, VippsClient};
//! use integrations_vipps::services::recurring::AgreementStatus;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = vipps_config()
//!         .environment(Environment::Testing)
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .subscription_key("my-subscription-key")
//!         .build()?;
//!
//!     let client = VippsClient::new(config)?;
//!
//!     let active = client
//!         .recurring()
//!         .list_agreements(Some(AgreementStatus::Active))
//!         .await?;
//!     println!("{} active agreements", active.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: credentials, environment, configuration and token types
//! - `error`: error hierarchy and API error translation
//! - `core`: HTTP transport, authentication decorators and the API client
//! - `flows`: client credentials grant
//! - `token`: token caching and refresh
//! - `telemetry`: logging port and sinks
//! - `services`: e-commerce, recurring and login surfaces
//! - `builders`: fluent configuration builder
//! - `client`: high-level client wiring it all together

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod services;
pub mod telemetry;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{vipps_client, VippsClient};

// Re-export builders
pub use builders::{vipps_config, VippsConfigBuilder};

// Re-export errors
pub use error::{
    translate, ConfigurationError, DecodeError, ErrorEnvelope, HttpError, NetworkError,
    RequestError, TokenError, UnexpectedResponseError, VippsError, VippsResult,
};

// Re-export types
pub use types::{AccessToken, Credentials, Environment, TokenResponse, VippsConfig};

// Re-export core
pub use crate::core::{
    ApiClient, AuthenticatingTransport, BearerTransport, HttpMethod, HttpRequest, HttpResponse,
    HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};

// Re-export services
pub use services::ecom::{EcomApiError, EcomError};
pub use services::recurring::{RecurringApiError, RecurringError};
pub use services::{EcomService, EcomServiceTrait, LoginConfig, RecurringService, RecurringServiceTrait};

// Re-export telemetry
pub use telemetry::{InMemoryLogger, LogArgument, LogContext, Logger, NoOpLogger, StdOutLogger, TracingLogger};
