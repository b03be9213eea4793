//! E-commerce API errors.

use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::{null_as_default, ErrorEnvelope};

/// A single error returned by the e-commerce API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EcomApiError {
    #[serde(rename = "errorGroup", default, deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(rename = "errorMessage", default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "errorCode", default, deserialize_with = "null_as_default")]
    pub code: String,
}

/// Errors returned by the e-commerce API, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EcomError(pub Vec<EcomApiError>);

impl<'de> Deserialize<'de> for EcomError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` is an empty list.
        Option::<Vec<EcomApiError>>::deserialize(deserializer).map(|e| Self(e.unwrap_or_default()))
    }
}

impl fmt::Display for EcomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("vipps:")?;
        if self.0.len() > 1 {
            f.write_str(" multiple errors:")?;
        }
        for e in &self.0 {
            write!(f, " [{}] {} (code {})", e.group, e.message, e.code)?;
        }
        Ok(())
    }
}

impl std::error::Error for EcomError {}

impl ErrorEnvelope for EcomError {}
