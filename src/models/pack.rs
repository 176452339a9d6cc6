use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cadence::SubscriptionCadence;

/// A subscription product. `price` is the USD price of one billing period.
/// Immutable once a purchase flow starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pack {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub cadence: SubscriptionCadence,
}

impl Pack {
    /// Builds a pack from backend data where the cadence arrives as a
    /// free-form label ("annuel", "monthly", ...).
    pub fn with_cadence_label(id: i64, name: &str, price: Decimal, cadence_label: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            cadence: SubscriptionCadence::from_label(cadence_label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_with_cadence_label() {
        let pack = Pack::with_cadence_label(7, "Gold", dec!(20), "annuel");

        assert_eq!(pack.cadence, SubscriptionCadence::Annual);
        assert_eq!(pack.cadence.step(), 12);
        assert_eq!(pack.price, dec!(20));
    }
}
