//! Helper functions shared across api/ and services/.

use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::LazyLock;

/// Client to make http requests
pub static REQUEST_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// Rounds a money amount to 2 decimal places, midpoint away from zero.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Keeps only the ASCII digits of a user-entered value.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round2() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(41)), dec!(41));
        assert_eq!(round2(dec!(2.4949)), dec!(2.49));
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("4111 1111 1111 1111"), "4111111111111111");
        assert_eq!(digits_only("+243 081-234"), "243081234");
        assert_eq!(digits_only(""), "");
    }
}
