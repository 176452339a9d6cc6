//! Submission guards shared by all payment forms.
//!
//! Everything here is local and synchronous; nothing is sent to the
//! backend on a validation failure.

use rust_decimal::Decimal;

use crate::{api::resolver::PaymentSession, errors::ValidationError};

/// Parses a free-form amount entry (withdrawal and transfer forms let the
/// user type the amount). Must be a finite number strictly greater than 0.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or(ValidationError::InvalidAmount)
}

/// Full submission guard. Run synchronously right before the POST as well,
/// so a form can never partially submit.
pub fn validate(session: &PaymentSession) -> Result<(), ValidationError> {
    // an unresolved fee state always blocks, whatever else is valid
    if session.fees_error() {
        return Err(ValidationError::FeesUnavailable);
    }

    if session.resolution().total <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount);
    }

    session.payment_method().validate_fields()?;

    if session.payment_method().is_wallet() {
        let balance = session
            .wallet_balance()
            .ok_or(ValidationError::BalanceUnavailable)?;
        if session.resolution().total > balance {
            return Err(ValidationError::InsufficientBalance);
        }
    }

    Ok(())
}

pub fn can_submit(session: &PaymentSession) -> bool {
    validate(session).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::resolver::RecalcOutcome,
        models::{
            cadence::SubscriptionCadence,
            fee::FeeScope,
            pack::Pack,
            payment_method::{CreditCardFields, PaymentMethod},
        },
        services::{ImplPaymentBackend, MockPaymentBackend},
    };
    use rust_decimal_macros::dec;

    fn gold_pack() -> Pack {
        Pack {
            id: 7,
            name: "Gold".into(),
            price: dec!(20),
            cadence: SubscriptionCadence::Annual,
        }
    }

    fn wallet_backend(percentage: Decimal, balance: Decimal) -> ImplPaymentBackend {
        let mut mock = MockPaymentBackend::new();
        mock.expect_fetch_fee_percentage()
            .returning(move |_| Ok(percentage));
        mock.expect_wallet_balance().returning(move || Ok(balance));
        Box::new(mock)
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 "), Ok(dec!(12.50)));
        assert_eq!(parse_amount("0"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_amount("-3"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_amount("abc"), Err(ValidationError::InvalidAmount));
    }

    #[tokio::test]
    async fn test_insufficient_wallet_balance_blocks() {
        // total 20.00 against a 15.00 balance
        let backend = wallet_backend(dec!(0), dec!(15));
        let session = crate::api::resolver::PaymentSession::open(
            gold_pack(),
            FeeScope::Purchase,
            PaymentMethod::Wallet,
            &backend,
        )
        .await;

        assert_eq!(validate(&session), Err(ValidationError::InsufficientBalance));
        assert!(!can_submit(&session));
    }

    #[tokio::test]
    async fn test_sufficient_wallet_balance_passes() {
        let backend = wallet_backend(dec!(0), dec!(25));
        let session = crate::api::resolver::PaymentSession::open(
            gold_pack(),
            FeeScope::Purchase,
            PaymentMethod::Wallet,
            &backend,
        )
        .await;

        assert!(can_submit(&session));
    }

    #[tokio::test]
    async fn test_fees_error_blocks_even_when_everything_else_is_valid() {
        let mut mock = MockPaymentBackend::new();
        mock.expect_fetch_fee_percentage()
            .returning(|_| anyhow::bail!("fee service down"));
        mock.expect_wallet_balance().returning(|| Ok(dec!(1000)));
        let backend: ImplPaymentBackend = Box::new(mock);

        let session = crate::api::resolver::PaymentSession::open(
            gold_pack(),
            FeeScope::Purchase,
            PaymentMethod::Wallet,
            &backend,
        )
        .await;

        assert!(session.fees_error());
        assert_eq!(validate(&session), Err(ValidationError::FeesUnavailable));
    }

    #[tokio::test]
    async fn test_invalid_card_fields_block() {
        let mut mock = MockPaymentBackend::new();
        mock.expect_fetch_fee_percentage().returning(|_| Ok(dec!(0)));
        mock.expect_wallet_balance().returning(|| Ok(dec!(1000)));
        let backend: ImplPaymentBackend = Box::new(mock);

        let mut session = crate::api::resolver::PaymentSession::open(
            gold_pack(),
            FeeScope::Purchase,
            PaymentMethod::Wallet,
            &backend,
        )
        .await;
        session.set_payment_method(PaymentMethod::CreditCard {
            option: Some("visa".into()),
            fields: CreditCardFields::default(),
        });

        assert_eq!(validate(&session), Err(ValidationError::MissingFields));

        session.set_payment_method(PaymentMethod::CreditCard {
            option: Some("visa".into()),
            fields: CreditCardFields {
                card_number: "4111111111111111".into(),
                card_holder: "Jane Doe".into(),
                expiry_date: "04/27".into(),
                cvv: "123".into(),
            },
        });
        assert_eq!(session.recalculate(&backend).await, RecalcOutcome::Updated);

        assert!(can_submit(&session));
    }
}
