//! Request types for the recurring payments service.

use chrono::NaiveDate;
use serde::Serialize;

use super::{AgreementStatus, Interval, TransactionType};

/// Charge taken when the agreement is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialCharge {
    pub amount: u64,
    pub currency: String,
    pub description: String,
    pub transaction_type: TransactionType,
}

/// Request to create an agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgreementRequest {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_charge: Option<InitialCharge>,
    pub interval: Interval,
    pub interval_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_app: Option<bool>,
    /// Where the user is sent after accepting or rejecting.
    pub merchant_redirect_url: String,
    /// Where the user manages the agreement.
    pub merchant_agreement_url: String,
    /// Price per interval, in øre.
    pub price: u64,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
}

impl CreateAgreementRequest {
    /// Create a new NOK agreement request
    pub fn new(
        product_name: impl Into<String>,
        price: u64,
        interval: Interval,
        interval_count: u32,
        merchant_redirect_url: impl Into<String>,
        merchant_agreement_url: impl Into<String>,
    ) -> Self {
        Self {
            currency: "NOK".to_string(),
            customer_phone_number: None,
            initial_charge: None,
            interval,
            interval_count,
            is_app: None,
            merchant_redirect_url: merchant_redirect_url.into(),
            merchant_agreement_url: merchant_agreement_url.into(),
            price,
            product_name: product_name.into(),
            product_description: None,
        }
    }

    pub fn customer_phone_number(mut self, number: impl Into<String>) -> Self {
        self.customer_phone_number = Some(number.into());
        self
    }

    pub fn initial_charge(mut self, charge: InitialCharge) -> Self {
        self.initial_charge = Some(charge);
        self
    }

    pub fn product_description(mut self, description: impl Into<String>) -> Self {
        self.product_description = Some(description.into());
        self
    }

    pub fn is_app(mut self, is_app: bool) -> Self {
        self.is_app = Some(is_app);
        self
    }
}

/// Request to update an agreement. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgreementRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    /// Only [`AgreementStatus::Stopped`] is accepted by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AgreementStatus>,
}

impl UpdateAgreementRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that stops the agreement.
    pub fn stop() -> Self {
        Self {
            status: Some(AgreementStatus::Stopped),
            ..Self::default()
        }
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn product_description(mut self, description: impl Into<String>) -> Self {
        self.product_description = Some(description.into());
        self
    }

    pub fn price(mut self, price: u64) -> Self {
        self.price = Some(price);
        self
    }
}

/// Request to create a charge on an active agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargeRequest {
    pub amount: u64,
    pub currency: String,
    pub description: String,
    /// Serialized as `YYYY-MM-DD`.
    pub due: NaiveDate,
    /// Days Vipps keeps retrying a failed charge.
    pub retry_days: u32,
    /// Idempotency key, sent as the `Idempotency-Key` header.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl CreateChargeRequest {
    /// Create a new NOK charge request
    pub fn new(amount: u64, description: impl Into<String>, due: NaiveDate) -> Self {
        Self {
            amount,
            currency: "NOK".to_string(),
            description: description.into(),
            due,
            retry_days: 0,
            idempotency_key: None,
        }
    }

    pub fn retry_days(mut self, days: u32) -> Self {
        self.retry_days = days;
        self
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}
