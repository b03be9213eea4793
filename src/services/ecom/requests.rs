//! Request types for the e-commerce service.
//!
//! Amounts are in øre (1/100 NOK).

use serde::Serialize;

/// Request to initiate a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatePaymentRequest {
    /// Merchant's unique order id.
    pub order_id: String,
    pub amount: u64,
    /// Text shown to the user in the Vipps app.
    pub transaction_text: String,
    /// Base URL Vipps sends payment callbacks to.
    pub callback_prefix: String,
    /// Where the user is sent when the payment is done.
    pub fallback_url: String,
    /// Pre-fills the phone number on the landing page.
    pub mobile_number: Option<String>,
    /// The payment is initiated from a native app.
    pub is_app: Option<bool>,
    pub skip_landing_page: Option<bool>,
    /// Echoed in the `Authorization` header of callbacks.
    pub auth_token: Option<String>,
}

impl InitiatePaymentRequest {
    /// Create a new request
    pub fn new(
        order_id: impl Into<String>,
        amount: u64,
        transaction_text: impl Into<String>,
        callback_prefix: impl Into<String>,
        fallback_url: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            transaction_text: transaction_text.into(),
            callback_prefix: callback_prefix.into(),
            fallback_url: fallback_url.into(),
            mobile_number: None,
            is_app: None,
            skip_landing_page: None,
            auth_token: None,
        }
    }

    pub fn mobile_number(mut self, number: impl Into<String>) -> Self {
        self.mobile_number = Some(number.into());
        self
    }

    pub fn is_app(mut self, is_app: bool) -> Self {
        self.is_app = Some(is_app);
        self
    }

    pub fn skip_landing_page(mut self, skip: bool) -> Self {
        self.skip_landing_page = Some(skip);
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub(crate) fn into_body(self, merchant_serial_number: &str) -> InitiatePaymentBody<'_> {
        InitiatePaymentBody {
            customer_info: CustomerInfo {
                mobile_number: self.mobile_number,
            },
            merchant_info: InitiateMerchantInfo {
                merchant_serial_number,
                callback_prefix: self.callback_prefix,
                fall_back: self.fallback_url,
                is_app: self.is_app,
                auth_token: self.auth_token,
            },
            transaction: InitiateTransaction {
                order_id: self.order_id,
                amount: self.amount,
                transaction_text: self.transaction_text,
                skip_landing_page: self.skip_landing_page,
            },
        }
    }
}

/// Amount and text of a capture or refund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Amount to move. For captures, `0` captures the full reserved amount.
    pub amount: u64,
    pub transaction_text: String,
    /// Idempotency key, sent as `X-Request-Id`.
    pub request_id: Option<String>,
}

impl TransactionRequest {
    /// Create a new request
    pub fn new(amount: u64, transaction_text: impl Into<String>) -> Self {
        Self {
            amount,
            transaction_text: transaction_text.into(),
            request_id: None,
        }
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InitiatePaymentBody<'a> {
    customer_info: CustomerInfo,
    merchant_info: InitiateMerchantInfo<'a>,
    transaction: InitiateTransaction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiateMerchantInfo<'a> {
    merchant_serial_number: &'a str,
    callback_prefix: String,
    fall_back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_app: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiateTransaction {
    order_id: String,
    amount: u64,
    transaction_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_landing_page: Option<bool>,
}

/// Body of capture, refund and cancel requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionBody<'a> {
    merchant_info: MerchantSerial<'a>,
    transaction: TransactionDetails<'a>,
}

impl<'a> TransactionBody<'a> {
    pub(crate) fn new(
        merchant_serial_number: &'a str,
        amount: Option<u64>,
        transaction_text: &'a str,
    ) -> Self {
        Self {
            merchant_info: MerchantSerial {
                merchant_serial_number,
            },
            transaction: TransactionDetails {
                amount,
                transaction_text,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MerchantSerial<'a> {
    merchant_serial_number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionDetails<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<u64>,
    transaction_text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_initiate_payment_body() {
        let request = InitiatePaymentRequest::new(
            "order-1",
            1000,
            "One pair of socks",
            "https://shop.example/callback",
            "https://shop.example/done",
        )
        .mobile_number("91234567")
        .is_app(false);

        let body = serde_json::to_value(request.into_body("123456")).unwrap();
        assert_eq!(
            body,
            json!({
                "customerInfo": {"mobileNumber": "91234567"},
                "merchantInfo": {
                    "merchantSerialNumber": "123456",
                    "callbackPrefix": "https://shop.example/callback",
                    "fallBack": "https://shop.example/done",
                    "isApp": false
                },
                "transaction": {
                    "orderId": "order-1",
                    "amount": 1000,
                    "transactionText": "One pair of socks"
                }
            })
        );
    }

    #[test]
    fn test_cancel_body_has_no_amount() {
        let body = serde_json::to_value(TransactionBody::new("123456", None, "Out of stock")).unwrap();
        assert_eq!(
            body,
            json!({
                "merchantInfo": {"merchantSerialNumber": "123456"},
                "transaction": {"transactionText": "Out of stock"}
            })
        );
    }
}
