pub mod backend;

use crate::models;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Seam to the wallet backend. Every form owns one boxed instance injected
/// at construction; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentBackend {
    /// Flat fee percentage for the scope, quoted once per session against
    /// the fixed reference amount.
    async fn fetch_fee_percentage(&self, scope: models::fee::FeeScope) -> anyhow::Result<Decimal>;

    /// Converts `amount` between two currencies. Single hop only; pivoting
    /// through USD is the resolver's job.
    async fn convert(&self, amount: Decimal, from: &str, to: &str) -> anyhow::Result<Decimal>;

    async fn wallet_balance(&self) -> anyhow::Result<Decimal>;

    /// Sends one assembled submission. `Ok` carries the backend success
    /// message; `Err` carries the backend failure message verbatim.
    async fn submit(
        &self,
        kind: &models::backend::SubmissionKind,
        payload: &models::backend::SubmissionPayload,
    ) -> anyhow::Result<String>;
}

pub type ImplPaymentBackend = Box<dyn PaymentBackend>;
