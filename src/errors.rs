//! Error taxonomy for the payment flows.
//!
//! Validation errors are local and synchronous; they are surfaced inline
//! and never sent to the backend. Fee/conversion fetch failures are not
//! errors at all but recoverable flags on the session. Submission errors
//! carry the backend message verbatim.

use derive_more::{Display, Error};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ValidationError {
    #[display("amount must be a positive number")]
    InvalidAmount,

    #[display("insufficient balance")]
    InsufficientBalance,

    #[display("wallet balance is unknown, refresh it before submitting")]
    BalanceUnavailable,

    #[display("fill all required fields")]
    MissingFields,

    #[display("card number must have at least 13 digits")]
    CardNumberTooShort,

    #[display("expiry date must match MM/YY")]
    BadExpiryDate,

    #[display("cvv must be 3 or 4 digits")]
    BadCvv,

    #[display("phone number must have {expected_digits} digits for {country}")]
    BadPhoneNumber {
        country: String,
        expected_digits: usize,
    },

    #[display("select a payment option")]
    MissingPaymentOption,

    #[display("fees are unavailable, recalculate before submitting")]
    FeesUnavailable,
}

/// Backend-reported submission failure. The message is shown to the user
/// as-is; the form stays open for correction.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{message}")]
pub struct SubmissionError {
    #[error(not(source))]
    pub message: String,
}
