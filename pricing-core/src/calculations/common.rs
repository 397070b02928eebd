//! Common helpers shared by the pricing worksheets.
//!
//! All worksheet arithmetic is exact decimal arithmetic. Rounding to cents
//! happens only when a value is presented, through [`round_half_up`].

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during worksheet calculations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A worksheet line does not fit in a [`Decimal`].
    #[error("{0} is too large to calculate")]
    Overflow(&'static str),
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pricing_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(205.632)), dec!(205.63));
/// assert_eq!(round_half_up(dec!(20.405)), dec!(20.41));
/// assert_eq!(round_half_up(dec!(-20.405)), dec!(-20.41)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `percentage` percent of `amount`, i.e. `amount * percentage / 100`,
/// or `None` when the product overflows.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use pricing_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(170), dec!(20)), Some(dec!(34)));
/// assert_eq!(percent_of(dec!(183.6), dec!(12)), Some(dec!(22.032)));
/// assert_eq!(percent_of(Decimal::MAX, dec!(200)), None);
/// ```
pub fn percent_of(
    amount: Decimal,
    percentage: Decimal,
) -> Option<Decimal> {
    amount
        .checked_mul(percentage)?
        .checked_div(Decimal::ONE_HUNDRED)
}

/// `a + b` for worksheet `line`.
pub(crate) fn add(
    line: &'static str,
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, CalculationError> {
    a.checked_add(b).ok_or(CalculationError::Overflow(line))
}

/// `a - b` for worksheet `line`.
pub(crate) fn sub(
    line: &'static str,
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, CalculationError> {
    a.checked_sub(b).ok_or(CalculationError::Overflow(line))
}

/// `percentage` percent of `amount` for worksheet `line`.
pub(crate) fn percent(
    line: &'static str,
    amount: Decimal,
    percentage: Decimal,
) -> Result<Decimal, CalculationError> {
    percent_of(amount, percentage).ok_or(CalculationError::Overflow(line))
}

/// Formats an amount as currency with two decimals, e.g. `$1,234.50` or `-$20.40`.
pub fn format_currency(
    symbol: &str,
    amount: Decimal,
) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{symbol}{grouped}.{cents}")
}
