//! Response types for the e-commerce service.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response to a payment initiation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentResponse {
    pub order_id: String,
    /// Landing page or app-switch URL the user should be sent to.
    pub url: String,
}

/// Running totals for a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionSummary {
    pub captured_amount: u64,
    pub remaining_amount_to_capture: u64,
    pub refunded_amount: u64,
    pub remaining_amount_to_refund: u64,
    pub bank_identification_number: Option<String>,
}

/// One operation in the payment's history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLogEntry {
    #[serde(default)]
    pub amount: u64,
    /// `INITIATE`, `RESERVE`, `CAPTURE`, `REFUND`, `CANCEL`, ...
    pub operation: String,
    #[serde(default)]
    pub operation_success: bool,
    pub time_stamp: Option<DateTime<Utc>>,
    pub transaction_text: Option<String>,
    pub transaction_id: Option<String>,
    pub request_id: Option<String>,
}

/// Payment details with the full transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub order_id: String,
    pub transaction_summary: Option<TransactionSummary>,
    #[serde(default)]
    pub transaction_log_history: Vec<TransactionLogEntry>,
}

impl PaymentDetails {
    /// Most recent successful operation, if any.
    pub fn last_successful_operation(&self) -> Option<&TransactionLogEntry> {
        self.transaction_log_history
            .iter()
            .filter(|e| e.operation_success)
            .max_by_key(|e| e.time_stamp)
    }
}

/// The transaction created by a capture, refund or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    #[serde(default)]
    pub amount: u64,
    pub status: String,
    pub time_stamp: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub transaction_text: Option<String>,
}

/// Response to a capture, refund or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub order_id: String,
    pub transaction_info: TransactionInfo,
    #[serde(default)]
    pub transaction_summary: TransactionSummary,
}
