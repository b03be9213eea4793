//! Response types for the recurring payments service.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{AgreementStatus, ChargeStatus, Interval};

/// A recurring payment agreement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub id: String,
    pub status: AgreementStatus,
    pub start: Option<DateTime<Utc>>,
    pub stop: Option<DateTime<Utc>>,
    pub product_name: String,
    pub product_description: Option<String>,
    /// Price per interval, in øre.
    pub price: u64,
    pub currency: String,
    pub interval: Interval,
    pub interval_count: u32,
}

/// A charge on an agreement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub id: String,
    pub status: ChargeStatus,
    pub due: DateTime<Utc>,
    pub amount: u64,
    #[serde(default)]
    pub amount_refunded: u64,
    pub description: String,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
    pub failure_description: Option<String>,
}

/// Response to an agreement creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgreementResponse {
    pub agreement_id: String,
    pub agreement_resource: Option<String>,
    /// Where the user confirms the agreement.
    pub vipps_confirmation_url: String,
    /// Set when the agreement has an initial charge.
    pub charge_id: Option<String>,
}

/// Response to an agreement update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgreementResponse {
    pub agreement_id: String,
}

/// Response to a charge creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargeResponse {
    pub charge_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agreement() {
        let json = r#"{
            "id": "agr_5kSeqz",
            "start": "2019-06-01T00:00:00Z",
            "stop": null,
            "status": "ACTIVE",
            "productName": "Premier League subscription",
            "price": 49900,
            "productDescription": "Access to all games of English top football",
            "interval": "MONTH",
            "intervalCount": 1,
            "currency": "NOK"
        }"#;

        let agreement: Agreement = serde_json::from_str(json).unwrap();
        assert_eq!(agreement.status, AgreementStatus::Active);
        assert_eq!(agreement.interval, Interval::Month);
        assert!(agreement.stop.is_none());
    }

    #[test]
    fn test_charge() {
        let json = r#"{
            "id": "chr_WCVbcA",
            "status": "PROCESSING",
            "due": "2019-06-01T00:00:00Z",
            "amount": 49900,
            "amountRefunded": 0,
            "transactionId": "5001419121",
            "description": "Premier League",
            "type": "RECURRING",
            "failureReason": null,
            "failureDescription": null
        }"#;

        let charge: Charge = serde_json::from_str(json).unwrap();
        assert_eq!(charge.status, ChargeStatus::Processing);
        assert!(charge.status.is_in_progress());
    }
}
