use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils;

/// Amounts derived for the current selection. Recomputed whenever the
/// subscription selection or the fee quote changes.
///
/// Invariants: `converted_amount = round2(unit_price_converted × periods)`
/// and `total = converted_amount + fee`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountResolution {
    pub periods: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price_converted: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub converted_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl AmountResolution {
    /// Builds a resolution from its independent parts, deriving the
    /// converted amount and total so the invariants hold by construction.
    pub fn derive(
        periods: u32,
        base_amount: Decimal,
        unit_price_converted: Decimal,
        fee: Decimal,
    ) -> Self {
        let converted_amount = utils::round2(unit_price_converted * Decimal::from(periods));

        Self {
            periods,
            base_amount,
            unit_price_converted,
            converted_amount,
            fee,
            total: converted_amount + fee,
        }
    }

    /// Empty resolution used before the first recalculation.
    pub fn empty() -> Self {
        Self::derive(1, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    }
}
