//! E-commerce service implementation.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use super::*;
use crate::core::{ApiClient, HttpMethod, HttpRequest};
use crate::error::{translate, ConfigurationError, VippsError, VippsResult};

const REQUEST_ID_HEADER: &str = "X-Request-Id";
const MERCHANT_SERIAL_NUMBER_HEADER: &str = "Merchant-Serial-Number";

/// Trait for e-commerce service operations
#[async_trait]
pub trait EcomServiceTrait: Send + Sync {
    /// Initiate a payment
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> VippsResult<InitiatePaymentResponse>;

    /// Get payment details and transaction history
    async fn get_payment_details(&self, order_id: &str) -> VippsResult<PaymentDetails>;

    /// Capture a reserved payment
    async fn capture_payment(
        &self,
        order_id: &str,
        request: TransactionRequest,
    ) -> VippsResult<TransactionResponse>;

    /// Cancel a payment that has not been captured
    async fn cancel_payment(
        &self,
        order_id: &str,
        transaction_text: &str,
    ) -> VippsResult<TransactionResponse>;

    /// Refund a captured payment
    async fn refund_payment(
        &self,
        order_id: &str,
        request: TransactionRequest,
    ) -> VippsResult<TransactionResponse>;
}

/// E-commerce service implementation
#[derive(Clone)]
pub struct EcomService {
    api: Arc<ApiClient>,
    merchant_serial_number: Option<String>,
}

impl EcomService {
    /// Create a new e-commerce service
    pub fn new(api: Arc<ApiClient>, merchant_serial_number: Option<String>) -> Self {
        Self {
            api,
            merchant_serial_number,
        }
    }

    fn merchant_serial_number(&self) -> VippsResult<&str> {
        self.merchant_serial_number.as_deref().ok_or_else(|| {
            VippsError::Configuration(ConfigurationError::MissingField {
                field: "merchant_serial_number".to_string(),
            })
        })
    }

    fn payment_url(&self, order_id: &str, action: &str) -> VippsResult<String> {
        let url = self
            .api
            .endpoint(&["ecomm", "v2", "payments", order_id, action])?;
        Ok(url.into())
    }

    fn with_merchant_header(&self, mut request: HttpRequest) -> VippsResult<HttpRequest> {
        if let Some(msn) = &self.merchant_serial_number {
            request.set_header(MERCHANT_SERIAL_NUMBER_HEADER, msn)?;
        }
        Ok(request)
    }

    async fn transaction(
        &self,
        method: HttpMethod,
        order_id: &str,
        action: &str,
        amount: Option<u64>,
        transaction_text: &str,
        request_id: Option<&str>,
    ) -> VippsResult<TransactionResponse> {
        let msn = self.merchant_serial_number()?;
        let body = TransactionBody::new(msn, amount, transaction_text);
        let mut request =
            self.api
                .new_request(method, &self.payment_url(order_id, action)?, Some(&body))?;
        if let Some(request_id) = request_id {
            request.set_header(REQUEST_ID_HEADER, request_id)?;
        }

        let request = self.with_merchant_header(request)?;
        self.api
            .execute(request)
            .await
            .map_err(translate::<EcomError>)
    }
}

#[async_trait]
impl EcomServiceTrait for EcomService {
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> VippsResult<InitiatePaymentResponse> {
        let msn = self.merchant_serial_number()?;
        let body = request.into_body(msn);
        let url = self.api.endpoint(&["ecomm", "v2", "payments"])?;
        let request = self
            .api
            .new_request(HttpMethod::Post, url.as_str(), Some(&body))?;

        let request = self.with_merchant_header(request)?;
        self.api
            .execute(request)
            .await
            .map_err(translate::<EcomError>)
    }

    #[instrument(skip(self))]
    async fn get_payment_details(&self, order_id: &str) -> VippsResult<PaymentDetails> {
        let request = self
            .api
            .new_empty_request(HttpMethod::Get, &self.payment_url(order_id, "details")?)?;

        let request = self.with_merchant_header(request)?;
        self.api
            .execute(request)
            .await
            .map_err(translate::<EcomError>)
    }

    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn capture_payment(
        &self,
        order_id: &str,
        request: TransactionRequest,
    ) -> VippsResult<TransactionResponse> {
        self.transaction(
            HttpMethod::Post,
            order_id,
            "capture",
            Some(request.amount),
            &request.transaction_text,
            request.request_id.as_deref(),
        )
        .await
    }

    #[instrument(skip(self, transaction_text))]
    async fn cancel_payment(
        &self,
        order_id: &str,
        transaction_text: &str,
    ) -> VippsResult<TransactionResponse> {
        self.transaction(
            HttpMethod::Put,
            order_id,
            "cancel",
            None,
            transaction_text,
            None,
        )
        .await
    }

    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn refund_payment(
        &self,
        order_id: &str,
        request: TransactionRequest,
    ) -> VippsResult<TransactionResponse> {
        self.transaction(
            HttpMethod::Post,
            order_id,
            "refund",
            Some(request.amount),
            &request.transaction_text,
            request.request_id.as_deref(),
        )
        .await
    }
}
