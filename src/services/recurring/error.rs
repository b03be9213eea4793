//! Recurring payments API errors.

use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::{null_as_default, ErrorEnvelope};

/// A single error returned by the recurring payments API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecurringApiError {
    #[serde(deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "contextId")]
    pub context_id: Option<String>,
}

/// Errors returned by the recurring payments API, in the order they were
/// received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurringError(pub Vec<RecurringApiError>);

impl<'de> Deserialize<'de> for RecurringError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Vec<RecurringApiError>>::deserialize(deserializer)
            .map(|e| Self(e.unwrap_or_default()))
    }
}

impl fmt::Display for RecurringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("vipps:")?;
        if self.0.len() > 1 {
            f.write_str(" multiple errors:")?;
        }
        for e in &self.0 {
            write!(f, " field {}: {} (code {})", e.field, e.message, e.code)?;
        }
        Ok(())
    }
}

impl std::error::Error for RecurringError {}

impl ErrorEnvelope for RecurringError {}
