//! Vipps Error Types
//!
//! Error hierarchy for the request pipeline and the per-surface error
//! translation protocol.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

use crate::services::ecom::EcomError;
use crate::services::recurring::RecurringError;

/// Root error type for the Vipps integration.
#[derive(Error, Debug)]
pub enum VippsError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Non-2xx response, before surface-specific interpretation.
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    UnexpectedResponse(#[from] UnexpectedResponseError),

    #[error(transparent)]
    Ecom(#[from] EcomError),

    #[error(transparent)]
    Recurring(#[from] RecurringError),
}

impl VippsError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "VIPPS_CONFIG",
            Self::Request(_) => "VIPPS_REQUEST",
            Self::Network(_) => "VIPPS_NETWORK",
            Self::Token(_) => "VIPPS_TOKEN",
            Self::Http(_) => "VIPPS_HTTP",
            Self::Decode(_) => "VIPPS_DECODE",
            Self::UnexpectedResponse(_) => "VIPPS_UNEXPECTED_RESPONSE",
            Self::Ecom(_) => "VIPPS_ECOM",
            Self::Recurring(_) => "VIPPS_RECURRING",
        }
    }

    /// HTTP status of the response that caused this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => Some(e.status),
            Self::UnexpectedResponse(e) => Some(e.status),
            Self::Token(TokenError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Unknown environment: {value}")]
    UnknownEnvironment { value: String },

    #[error("Failed to build HTTP client: {message}")]
    HttpClient { message: String },
}

/// The request could not be constructed.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to serialize request body: {message}")]
    InvalidBody { message: String },

    #[error("Invalid endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("Invalid header {name}")]
    InvalidHeader { name: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    /// `timeout` is the deadline that applied, when one was set.
    #[error("Request timed out")]
    Timeout { timeout: Option<Duration> },

    #[error("Failed to read response body: {message}")]
    BodyRead { message: String },

    #[error("Request failed: {message}")]
    Other { message: String },
}

/// Token acquisition error.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token endpoint responded with status {status}")]
    Rejected { status: u16, body: Bytes },

    #[error("Invalid token response: {message}")]
    InvalidResponse { message: String },

    #[error("Token request did not complete within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Token request failed: {source}")]
    Request {
        #[source]
        source: Box<VippsError>,
    },
}

/// A response was received with a status outside `200..=299`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("request failed with status: {status}")]
pub struct HttpError {
    pub body: Bytes,
    pub status: u16,
}

/// A successful response whose body was not the expected JSON.
#[derive(Error, Debug)]
#[error("failed to decode response body: {message}")]
pub struct DecodeError {
    pub message: String,
}

/// A non-2xx response whose body could not be decoded as the surface's error
/// envelope. Body and status are kept as received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("vipps: unexpected response with status {status}: {}", String::from_utf8_lossy(.body))]
pub struct UnexpectedResponseError {
    pub body: Bytes,
    pub status: u16,
}

/// Result type for Vipps operations.
pub type VippsResult<T> = Result<T, VippsError>;

/// A surface-specific JSON error envelope.
///
/// Implemented by each API surface's error list so that [`translate`] can
/// decode it out of a [`HttpError`] body.
pub trait ErrorEnvelope: DeserializeOwned + Into<VippsError> {}

/// Deserialize a field, reading `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Translate a transport-level error into the surface error `E`.
///
/// Only [`VippsError::Http`] is interpreted. A body that decodes as `E` (even
/// to zero entries) becomes `E`; anything else becomes
/// [`UnexpectedResponseError`] with the original body and status. All other
/// errors pass through untouched.
pub fn translate<E: ErrorEnvelope>(error: VippsError) -> VippsError {
    match error {
        VippsError::Http(HttpError { body, status }) => {
            match serde_json::from_slice::<E>(&body) {
                Ok(envelope) => envelope.into(),
                Err(_) => VippsError::UnexpectedResponse(UnexpectedResponseError { body, status }),
            }
        }
        other => other,
    }
}
