//! Canonical decimal-to-text conversion for UBL amounts.
//!
//! Every numeric node in the generated document goes through
//! [`format_amount`] with the digit count of its amount class: currency
//! amounts use the currency's decimal scale, quantities and discount
//! ratios 4 digits, unit prices 5, tax percentages 2.

use rust_decimal::{Decimal, RoundingStrategy};

use super::currencies::decimal_scale;

/// Fractional digits for quantities and discount multiplier ratios.
pub const QUANTITY_DIGITS: u32 = 4;
/// Fractional digits for unit prices — intentionally finer than amounts.
pub const PRICE_DIGITS: u32 = 5;
/// Fractional digits for tax percentages.
pub const PERCENT_DIGITS: u32 = 2;

/// Format `value` as a fixed-point decimal string with exactly `digits`
/// fractional digits, rounding half away from zero.
pub fn format_amount(value: Decimal, digits: u32) -> String {
    let rounded = value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.prec$}", prec = digits as usize)
}

/// Format a currency amount at the scale configured for `currency`.
pub fn format_currency_amount(value: Decimal, currency: &str) -> String {
    format_amount(value, decimal_scale(currency))
}
