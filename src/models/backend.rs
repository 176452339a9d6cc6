//! Wire schemas for the wallet backend REST API.
//!
//! The two transaction-fee endpoints answer with different envelopes
//! (`{success, percentage, fee}` vs `{status, data: {percentage}}`); both
//! shapes live here and are normalized by the REST handler.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct FeeQuoteRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Envelope of the purchase and transfer fee endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseFeeResponse {
    pub success: bool,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub fee: Decimal,
}

/// Envelope of the withdrawal fee endpoint.
#[derive(Debug, Deserialize)]
pub struct WithdrawalFeeResponse {
    pub status: String,
    pub data: WithdrawalFeeData,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalFeeData {
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ConvertRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(
        rename = "convertedAmount",
        default,
        with = "rust_decimal::serde::float"
    )]
    pub converted_amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    pub success: bool,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Response of the submission endpoints. A 422 carries a field-level
/// `errors` map instead of a single message.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl SubmitResponse {
    /// Message to display: the field-error map flattened and concatenated
    /// when present, the top-level message otherwise. Keys are sorted so
    /// the output is stable.
    pub fn flattened_message(&self) -> String {
        match &self.errors {
            Some(errors) if !errors.is_empty() => {
                let mut fields: Vec<&String> = errors.keys().collect();
                fields.sort();

                fields
                    .iter()
                    .flat_map(|field| errors[*field].iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            _ => self.message.clone(),
        }
    }
}

/// Which submission endpoint a payload goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionKind {
    PackPurchase,
    SerdiPayPayment,
    Withdrawal { wallet_id: i64 },
    FundsTransfer,
}

impl SubmissionKind {
    pub fn endpoint_path(&self) -> String {
        match self {
            Self::PackPurchase => "api/packs/purchase_a_new_pack".to_string(),
            Self::SerdiPayPayment => "api/serdipay/payment".to_string(),
            Self::Withdrawal { wallet_id } => format!("api/withdrawal/request/{wallet_id}"),
            Self::FundsTransfer => "api/funds-transfer".to_string(),
        }
    }
}

/// Read-only snapshot sent to a submission endpoint. Built once by the
/// assembler, sent once, never reused.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPayload {
    pub payment_type: String,
    pub payment_method: Option<String>,
    pub payment_details: Map<String, Value>,
    pub duration_months: u32,
    /// Always the converted amount, so it is consistent with `currency`.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fees: Decimal,
    pub pack_id: i64,
}
