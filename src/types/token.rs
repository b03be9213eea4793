//! Token Types
//!
//! Access token response and the cached token held by the token manager.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Token response from the access token endpoint.
///
/// Vipps sends `expires_in` as a string (`"86398"`); numbers are accepted too.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expires in seconds.
    #[serde(default, deserialize_with = "deserialize_expires_in")]
    pub expires_in: Option<u64>,
    /// Additional fields (`ext_expires_in`, `expires_on`, `resource`, ...).
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn deserialize_expires_in<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(u64),
        Text(String),
    }

    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Number(n)) => Ok(Some(n)),
        Some(Seconds::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Seconds::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Access token wrapper for safe handling.
#[derive(Clone)]
pub struct AccessToken {
    value: SecretString,
    /// Token type.
    pub token_type: String,
    /// Expiration time; `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(value: String, token_type: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: SecretString::new(value),
            token_type,
            expires_at,
        }
    }

    /// Build from a token response received at `now`.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let expires_at = response
            .expires_in
            .map(|secs| now + Duration::seconds(secs.min(i64::MAX as u64) as i64));
        Self::new(response.access_token, response.token_type, expires_at)
    }

    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    /// Whether the token is expired, or will be within `buffer`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, buffer: std::time::Duration) -> bool {
        let buffer = Duration::from_std(buffer).unwrap_or_else(|_| Duration::zero());
        self.expires_at
            .map(|exp| exp - buffer <= now)
            .unwrap_or(false)
    }

    /// Format as Authorization header value.
    ///
    /// The scheme is always sent as `Bearer`, whatever casing the token
    /// endpoint used for `token_type`.
    pub fn authorization_header(&self) -> String {
        if self.token_type.eq_ignore_ascii_case("bearer") || self.token_type.is_empty() {
            format!("Bearer {}", self.value.expose_secret())
        } else {
            format!("{} {}", self.token_type, self.value.expose_secret())
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
