use chrono::{DateTime, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils;

/// Backend fee schedule a quote belongs to. The display string is also the
/// path segment of the matching transaction-fees endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum FeeScope {
    #[display("purchase")]
    Purchase,
    #[display("withdrawal")]
    Withdrawal,
    #[display("transfer")]
    Transfer,
}

/// Flat-rate fee percentage quoted once per form session and reused for
/// every recalculation until the session closes or is refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeQuote {
    pub percentage: Decimal,
    pub fetched_at: DateTime<Utc>,
    pub scope: FeeScope,
}

impl FeeQuote {
    pub fn new(percentage: Decimal, scope: FeeScope) -> Self {
        Self {
            percentage,
            fetched_at: Utc::now(),
            scope,
        }
    }

    /// Fee for a converted amount: `round2(amount × percentage / 100)`.
    pub fn fee_for(&self, converted_amount: Decimal) -> Decimal {
        utils::round2(converted_amount * self.percentage / Decimal::ONE_HUNDRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_for_rounds_to_cents() {
        let quote = FeeQuote::new(dec!(2.5), FeeScope::Purchase);

        assert_eq!(quote.fee_for(dec!(40)), dec!(1.00));
        assert_eq!(quote.fee_for(dec!(33.33)), dec!(0.83));
    }

    #[test]
    fn test_zero_percentage_means_zero_fee() {
        let quote = FeeQuote::new(dec!(0), FeeScope::Withdrawal);

        assert_eq!(quote.fee_for(dec!(500)), dec!(0));
    }
}
