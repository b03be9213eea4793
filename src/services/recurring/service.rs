//! Recurring payments service implementation.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use super::*;
use crate::core::{ApiClient, HttpMethod};
use crate::error::{translate, VippsResult};
use url::Url;

const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Trait for recurring payments service operations
#[async_trait]
pub trait RecurringServiceTrait: Send + Sync {
    /// List agreements, optionally only those with `status`
    async fn list_agreements(&self, status: Option<AgreementStatus>) -> VippsResult<Vec<Agreement>>;

    /// Get an agreement
    async fn get_agreement(&self, agreement_id: &str) -> VippsResult<Agreement>;

    /// Create an agreement the user must confirm in the Vipps app
    async fn create_agreement(
        &self,
        request: CreateAgreementRequest,
    ) -> VippsResult<CreateAgreementResponse>;

    /// Update or stop an agreement
    async fn update_agreement(
        &self,
        agreement_id: &str,
        request: UpdateAgreementRequest,
    ) -> VippsResult<UpdateAgreementResponse>;

    /// List charges on an agreement
    async fn list_charges(&self, agreement_id: &str) -> VippsResult<Vec<Charge>>;

    /// Get a charge
    async fn get_charge(&self, agreement_id: &str, charge_id: &str) -> VippsResult<Charge>;

    /// Create a charge on an agreement
    async fn create_charge(
        &self,
        agreement_id: &str,
        request: CreateChargeRequest,
    ) -> VippsResult<CreateChargeResponse>;

    /// Cancel a charge that has not been processed
    async fn cancel_charge(&self, agreement_id: &str, charge_id: &str) -> VippsResult<()>;
}

/// Recurring payments service implementation
#[derive(Clone)]
pub struct RecurringService {
    api: Arc<ApiClient>,
}

impl RecurringService {
    /// Create a new recurring payments service
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn agreements_url(&self) -> VippsResult<Url> {
        self.api.endpoint(&["recurring", "v2", "agreements"])
    }

    fn agreement_url(&self, agreement_id: &str) -> VippsResult<String> {
        let url = self
            .api
            .endpoint(&["recurring", "v2", "agreements", agreement_id])?;
        Ok(url.into())
    }

    fn charges_url(&self, agreement_id: &str) -> VippsResult<String> {
        let url = self
            .api
            .endpoint(&["recurring", "v2", "agreements", agreement_id, "charges"])?;
        Ok(url.into())
    }

    fn charge_url(&self, agreement_id: &str, charge_id: &str) -> VippsResult<String> {
        let url = self.api.endpoint(&[
            "recurring",
            "v2",
            "agreements",
            agreement_id,
            "charges",
            charge_id,
        ])?;
        Ok(url.into())
    }
}

#[async_trait]
impl RecurringServiceTrait for RecurringService {
    #[instrument(skip(self))]
    async fn list_agreements(&self, status: Option<AgreementStatus>) -> VippsResult<Vec<Agreement>> {
        let mut url = self.agreements_url()?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        let request = self.api.new_empty_request(HttpMethod::Get, url.as_str())?;

        self.api
            .execute(request)
            .await
            .map_err(translate::<RecurringError>)
    }

    #[instrument(skip(self))]
    async fn get_agreement(&self, agreement_id: &str) -> VippsResult<Agreement> {
        let request = self
            .api
            .new_empty_request(HttpMethod::Get, &self.agreement_url(agreement_id)?)?;

        self.api
            .execute(request)
            .await
            .map_err(translate::<RecurringError>)
    }

    #[instrument(skip(self, request), fields(product_name = %request.product_name))]
    async fn create_agreement(
        &self,
        request: CreateAgreementRequest,
    ) -> VippsResult<CreateAgreementResponse> {
        let url = self.agreements_url()?;
        let request = self
            .api
            .new_request(HttpMethod::Post, url.as_str(), Some(&request))?;

        self.api
            .execute(request)
            .await
            .map_err(translate::<RecurringError>)
    }

    #[instrument(skip(self, request))]
    async fn update_agreement(
        &self,
        agreement_id: &str,
        request: UpdateAgreementRequest,
    ) -> VippsResult<UpdateAgreementResponse> {
        let request = self.api.new_request(
            HttpMethod::Patch,
            &self.agreement_url(agreement_id)?,
            Some(&request),
        )?;

        self.api
            .execute(request)
            .await
            .map_err(translate::<RecurringError>)
    }

    #[instrument(skip(self))]
    async fn list_charges(&self, agreement_id: &str) -> VippsResult<Vec<Charge>> {
        let request = self
            .api
            .new_empty_request(HttpMethod::Get, &self.charges_url(agreement_id)?)?;

        self.api
            .execute(request)
            .await
            .map_err(translate::<RecurringError>)
    }

    #[instrument(skip(self))]
    async fn get_charge(&self, agreement_id: &str, charge_id: &str) -> VippsResult<Charge> {
        let request = self.api.new_empty_request(
            HttpMethod::Get,
            &self.charge_url(agreement_id, charge_id)?,
        )?;

        self.api
            .execute(request)
            .await
            .map_err(translate::<RecurringError>)
    }

    #[instrument(skip(self, request), fields(amount = request.amount, due = %request.due))]
    async fn create_charge(
        &self,
        agreement_id: &str,
        request: CreateChargeRequest,
    ) -> VippsResult<CreateChargeResponse> {
        let mut http_request = self.api.new_request(
            HttpMethod::Post,
            &self.charges_url(agreement_id)?,
            Some(&request),
        )?;
        if let Some(key) = &request.idempotency_key {
            http_request.set_header(IDEMPOTENCY_KEY_HEADER, key)?;
        }

        self.api
            .execute(http_request)
            .await
            .map_err(translate::<RecurringError>)
    }

    #[instrument(skip(self))]
    async fn cancel_charge(&self, agreement_id: &str, charge_id: &str) -> VippsResult<()> {
        let request = self.api.new_empty_request(
            HttpMethod::Delete,
            &self.charge_url(agreement_id, charge_id)?,
        )?;

        self.api
            .execute_no_content(request)
            .await
            .map_err(translate::<RecurringError>)
    }
}
