//! REST implementation of the [`PaymentBackend`] seam.
//!
//! One handler per process is fine; it holds no per-form state. The two
//! transaction-fee envelope shapes are normalized here so callers only
//! ever see a percentage.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::error;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    config, consts,
    models::{
        backend::{
            BalanceResponse, ConvertRequest, ConvertResponse, FeeQuoteRequest,
            PurchaseFeeResponse, SubmissionKind, SubmissionPayload, SubmitResponse,
            WithdrawalFeeResponse,
        },
        fee::FeeScope,
    },
    services::PaymentBackend,
    utils,
};

pub struct RestBackendHandler {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl RestBackendHandler {
    /// Creates a handler from the application configuration.
    pub fn new() -> Self {
        let app_config = &*config::APP_CONFIG;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                app_config.request_timeout_secs,
            ))
            .build()
            .unwrap_or_else(|_| utils::REQUEST_CLIENT.clone());

        Self {
            client,
            base_url: app_config.backend_base_url.clone(),
            auth_token: app_config.backend_auth_token.clone(),
        }
    }

    /// Creates a handler against an explicit base URL, mainly for staging
    /// tools that talk to more than one backend.
    pub fn with_base_url(base_url: &str, auth_token: &str) -> Self {
        Self {
            client: utils::REQUEST_CLIENT.clone(),
            base_url: base_url.to_string(),
            auth_token: auth_token.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{base}/{path}",
            base = self.base_url.trim_end_matches('/'),
            path = path.trim_start_matches('/')
        )
    }

    async fn post_json<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        self.client
            .post(self.endpoint(path))
            .header("accept", "application/json")
            .bearer_auth(&self.auth_token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))
    }
}

impl Default for RestBackendHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentBackend for RestBackendHandler {
    async fn fetch_fee_percentage(&self, scope: FeeScope) -> Result<Decimal> {
        let body = FeeQuoteRequest {
            amount: consts::FEE_REFERENCE_AMOUNT,
        };
        let path = format!("api/transaction-fees/{scope}");

        let response = self.post_json(&path, &body).await?;
        if !response.status().is_success() {
            bail!("fee endpoint {scope} returned {}", response.status());
        }

        // The withdrawal endpoint wraps its data in a different envelope
        // than the purchase/transfer ones.
        match scope {
            FeeScope::Withdrawal => {
                let body: WithdrawalFeeResponse = response
                    .json()
                    .await
                    .context("failed to parse withdrawal fee response")?;
                if body.status != "success" {
                    bail!("withdrawal fee endpoint answered status {}", body.status);
                }
                Ok(body.data.percentage)
            }
            FeeScope::Purchase | FeeScope::Transfer => {
                let body: PurchaseFeeResponse = response
                    .json()
                    .await
                    .context("failed to parse fee response")?;
                if !body.success {
                    bail!("fee endpoint {scope} answered success=false");
                }
                Ok(body.percentage)
            }
        }
    }

    async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal> {
        let body = ConvertRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        };

        let response = self.post_json("api/currency/convert", &body).await?;
        if !response.status().is_success() {
            bail!("currency conversion returned {}", response.status());
        }

        let body: ConvertResponse = response
            .json()
            .await
            .context("failed to parse conversion response")?;
        if !body.success {
            bail!("currency conversion {from}->{to} answered success=false");
        }

        Ok(body.converted_amount)
    }

    async fn wallet_balance(&self) -> Result<Decimal> {
        let response = self
            .client
            .get(self.endpoint("api/userwallet/balance"))
            .header("accept", "application/json")
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .context("wallet balance request failed")?;

        if !response.status().is_success() {
            bail!("wallet balance returned {}", response.status());
        }

        let body: BalanceResponse = response
            .json()
            .await
            .context("failed to parse wallet balance response")?;
        if !body.success {
            bail!("wallet balance answered success=false");
        }

        Ok(body.balance)
    }

    async fn submit(&self, kind: &SubmissionKind, payload: &SubmissionPayload) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint(&kind.endpoint_path()))
            .header("accept", "application/json")
            .header(consts::IDEMPOTENCY_HEADER_NAME, Uuid::new_v4().to_string())
            .bearer_auth(&self.auth_token)
            .json(payload)
            .send()
            .await
            .context("submission request failed")?;

        let status = response.status();
        let body: SubmitResponse = response.json().await.unwrap_or_default();

        if status.is_success() && body.success {
            return Ok(body.message);
        }

        error!(
            "submission to {} rejected with http {status}",
            kind.endpoint_path()
        );
        let message = body.flattened_message();
        if message.is_empty() {
            bail!("payment could not be processed ({status})");
        }
        bail!("{message}");
    }
}
