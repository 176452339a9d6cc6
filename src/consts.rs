use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Reporting currency; the mandatory intermediate for cross conversions.
pub const PIVOT_CURRENCY: &str = "USD";
pub const DEFAULT_DISPLAY_CURRENCY: &str = "USD";

/// Amount quoted to the transaction-fee endpoints to obtain the flat
/// percentage reused for the whole form session.
pub const FEE_REFERENCE_AMOUNT: Decimal = dec!(100);

pub const MIN_CARD_NUMBER_DIGITS: usize = 13;

/// Mobile-money countries: (ISO 3166 alpha-2, calling code, local digits
/// expected after stripping the leading zero).
pub const MOBILE_MONEY_COUNTRIES: [(&str, &str, usize); 5] = [
    ("CD", "243", 9),
    ("CM", "237", 9),
    ("KE", "254", 9),
    ("TZ", "255", 9),
    ("UG", "256", 9),
];

pub const IDEMPOTENCY_HEADER_NAME: &str = "X-Idempotency-Key";

pub const FILL_REQUIRED_FIELDS_MSG: &str = "fill all required fields";
