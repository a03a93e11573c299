//! Money formatting for wire payloads.

use rust_decimal::Decimal;

/// Renders an amount with exactly two decimal places, the shape the
/// contribution endpoint expects ("200.00", not "200" or "200.0").
pub fn two_decimal_string(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
