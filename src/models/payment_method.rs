//! Payment method selection with strongly-typed per-method field schemas,
//! dispatched via exhaustive matching instead of string-keyed lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{consts, errors::ValidationError, utils};

/// Looks up (calling code, expected local digits) for a mobile-money
/// country. Countries outside the table only get a non-empty check.
pub fn mobile_money_country_spec(country: &str) -> Option<(&'static str, usize)> {
    consts::MOBILE_MONEY_COUNTRIES
        .iter()
        .find(|(iso, _, _)| iso.eq_ignore_ascii_case(country))
        .map(|(_, calling_code, digits)| (*calling_code, *digits))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditCardFields {
    pub card_number: String,
    pub card_holder: String,
    /// MM/YY
    pub expiry_date: String,
    pub cvv: String,
}

impl CreditCardFields {
    fn expiry_is_valid(&self) -> bool {
        let Some((month, year)) = self.expiry_date.split_once('/') else {
            return false;
        };

        let month_ok = month.len() == 2
            && month
                .parse::<u32>()
                .is_ok_and(|m| (1..=12).contains(&m));
        let year_ok = year.len() == 2 && year.chars().all(|c| c.is_ascii_digit());

        month_ok && year_ok
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.card_number.trim().is_empty()
            || self.card_holder.trim().is_empty()
            || self.expiry_date.trim().is_empty()
            || self.cvv.trim().is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        if utils::digits_only(&self.card_number).len() < consts::MIN_CARD_NUMBER_DIGITS {
            return Err(ValidationError::CardNumberTooShort);
        }

        if !self.expiry_is_valid() {
            return Err(ValidationError::BadExpiryDate);
        }

        let cvv_len = self.cvv.len();
        if !(3..=4).contains(&cvv_len) || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::BadCvv);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobileMoneyFields {
    /// ISO 3166 alpha-2, e.g. "CD"
    pub country: String,
    /// Locally-entered digits, possibly with a leading zero
    pub phone_number: String,
}

impl MobileMoneyFields {
    /// Local digits with at most one leading zero stripped.
    fn local_digits(&self) -> String {
        let digits = utils::digits_only(&self.phone_number);
        digits
            .strip_prefix('0')
            .map(str::to_string)
            .unwrap_or(digits)
    }

    /// Phone number as submitted to the backend: calling-code digits
    /// concatenated with the local digits. No leading "+", digits only.
    pub fn normalized_phone(&self) -> String {
        let local = self.local_digits();
        match mobile_money_country_spec(&self.country) {
            Some((calling_code, _)) => format!("{calling_code}{local}"),
            None => local,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.phone_number.trim().is_empty() {
            return Err(ValidationError::MissingFields);
        }

        if let Some((_, expected_digits)) = mobile_money_country_spec(&self.country)
            && self.local_digits().len() != expected_digits
        {
            return Err(ValidationError::BadPhoneNumber {
                country: self.country.to_uppercase(),
                expected_digits,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankTransferFields {
    pub account_name: String,
    pub account_number: String,
    pub bank_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoneyTransferFields {
    pub sender_full_name: String,
    pub reference: String,
}

/// The payment method picked in a form, carrying its own field schema.
/// `option` is the specific brand/operator ("visa", "m-pesa", ...) and is
/// mandatory for every method that exposes options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    Wallet,
    CreditCard {
        option: Option<String>,
        fields: CreditCardFields,
    },
    MobileMoney {
        option: Option<String>,
        fields: MobileMoneyFields,
    },
    BankTransfer {
        fields: BankTransferFields,
    },
    MoneyTransfer {
        option: Option<String>,
        fields: MoneyTransferFields,
    },
    Cash,
}

impl PaymentMethod {
    /// Generic payment type sent as `payment_type` in submissions.
    pub fn payment_type(&self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::CreditCard { .. } => "credit_card",
            Self::MobileMoney { .. } => "mobile_money",
            Self::BankTransfer { .. } => "bank_transfer",
            Self::MoneyTransfer { .. } => "money_transfer",
            Self::Cash => "cash",
        }
    }

    /// The selected brand/operator, when the method exposes options.
    pub fn specific_option(&self) -> Option<&str> {
        match self {
            Self::CreditCard { option, .. }
            | Self::MobileMoney { option, .. }
            | Self::MoneyTransfer { option, .. } => option.as_deref(),
            Self::Wallet | Self::BankTransfer { .. } | Self::Cash => None,
        }
    }

    pub fn exposes_options(&self) -> bool {
        matches!(
            self,
            Self::CreditCard { .. } | Self::MobileMoney { .. } | Self::MoneyTransfer { .. }
        )
    }

    pub fn is_wallet(&self) -> bool {
        matches!(self, Self::Wallet)
    }

    /// Method-specific field checks. Wallet and cash have no fields; the
    /// wallet balance check lives in the form validator because it needs
    /// the resolved total.
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        if self.exposes_options() && self.specific_option().is_none_or(|o| o.trim().is_empty()) {
            return Err(ValidationError::MissingPaymentOption);
        }

        match self {
            Self::Wallet | Self::Cash => Ok(()),
            Self::CreditCard { fields, .. } => fields.validate(),
            Self::MobileMoney { fields, .. } => fields.validate(),
            Self::BankTransfer { fields } => {
                if fields.account_name.trim().is_empty()
                    || fields.account_number.trim().is_empty()
                    || fields.bank_name.trim().is_empty()
                {
                    return Err(ValidationError::MissingFields);
                }
                Ok(())
            }
            Self::MoneyTransfer { fields, .. } => {
                if fields.sender_full_name.trim().is_empty() || fields.reference.trim().is_empty()
                {
                    return Err(ValidationError::MissingFields);
                }
                Ok(())
            }
        }
    }

    /// Field map sent as `payment_details` in submissions. Mobile-money
    /// phone numbers are normalized here.
    pub fn payment_details(&self) -> Map<String, Value> {
        let details = match self {
            Self::Wallet | Self::Cash => json!({}),
            Self::CreditCard { fields, .. } => json!({
                "card_number": utils::digits_only(&fields.card_number),
                "card_holder": fields.card_holder,
                "expiry_date": fields.expiry_date,
                "cvv": fields.cvv,
            }),
            Self::MobileMoney { fields, .. } => json!({
                "country": fields.country,
                "phone_number": fields.normalized_phone(),
            }),
            Self::BankTransfer { fields } => json!({
                "account_name": fields.account_name,
                "account_number": fields.account_number,
                "bank_name": fields.bank_name,
            }),
            Self::MoneyTransfer { fields, .. } => json!({
                "sender_full_name": fields.sender_full_name,
                "reference": fields.reference,
            }),
        };

        match details {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visa_card() -> PaymentMethod {
        PaymentMethod::CreditCard {
            option: Some("visa".into()),
            fields: CreditCardFields {
                card_number: "4111 1111 1111 1111".into(),
                card_holder: "Jane Doe".into(),
                expiry_date: "04/27".into(),
                cvv: "123".into(),
            },
        }
    }

    #[test]
    fn test_valid_credit_card() {
        assert!(visa_card().validate_fields().is_ok());
    }

    #[test]
    fn test_card_number_too_short() {
        let PaymentMethod::CreditCard { option, mut fields } = visa_card() else {
            unreachable!()
        };
        fields.card_number = "4111 1111 11".into();
        let method = PaymentMethod::CreditCard { option, fields };

        assert_eq!(
            method.validate_fields(),
            Err(ValidationError::CardNumberTooShort)
        );
    }

    #[test]
    fn test_card_expiry_format() {
        let PaymentMethod::CreditCard { option, mut fields } = visa_card() else {
            unreachable!()
        };
        fields.expiry_date = "2027-04".into();
        let method = PaymentMethod::CreditCard { option, fields };

        assert_eq!(method.validate_fields(), Err(ValidationError::BadExpiryDate));
    }

    #[test]
    fn test_card_cvv_must_be_3_or_4_digits() {
        let PaymentMethod::CreditCard { option, mut fields } = visa_card() else {
            unreachable!()
        };
        fields.cvv = "12".into();
        let method = PaymentMethod::CreditCard { option, fields };

        assert_eq!(method.validate_fields(), Err(ValidationError::BadCvv));
    }

    #[test]
    fn test_missing_option_is_rejected() {
        let PaymentMethod::CreditCard { fields, .. } = visa_card() else {
            unreachable!()
        };
        let method = PaymentMethod::CreditCard {
            option: None,
            fields,
        };

        assert_eq!(
            method.validate_fields(),
            Err(ValidationError::MissingPaymentOption)
        );
    }

    #[test]
    fn test_mobile_money_drc_expects_nine_digits() {
        let method = PaymentMethod::MobileMoney {
            option: Some("m-pesa".into()),
            fields: MobileMoneyFields {
                country: "CD".into(),
                phone_number: "81234567".into(),
            },
        };

        assert_eq!(
            method.validate_fields(),
            Err(ValidationError::BadPhoneNumber {
                country: "CD".into(),
                expected_digits: 9,
            })
        );
    }

    #[test]
    fn test_mobile_money_leading_zero_is_not_counted() {
        let method = PaymentMethod::MobileMoney {
            option: Some("m-pesa".into()),
            fields: MobileMoneyFields {
                country: "CD".into(),
                phone_number: "0812345678".into(),
            },
        };

        assert!(method.validate_fields().is_ok());
    }

    #[test]
    fn test_normalized_phone_prepends_calling_code() {
        let fields = MobileMoneyFields {
            country: "CD".into(),
            phone_number: "0812345678".into(),
        };

        assert_eq!(fields.normalized_phone(), "243812345678");
    }

    #[test]
    fn test_wallet_has_no_fields_to_validate() {
        assert!(PaymentMethod::Wallet.validate_fields().is_ok());
        assert!(PaymentMethod::Wallet.payment_details().is_empty());
        assert_eq!(PaymentMethod::Wallet.payment_type(), "wallet");
    }

    #[test]
    fn test_payment_details_normalizes_card_number() {
        let details = visa_card().payment_details();

        assert_eq!(
            details.get("card_number").and_then(Value::as_str),
            Some("4111111111111111")
        );
    }
}
