use crate::error::AnalyticsError;
use rust_decimal::Decimal;

/// Adds up `values`, reporting an overflow of the `Decimal` range as a calculation error.
pub fn checked_sum<I>(values: I, what: &str) -> Result<Decimal, AnalyticsError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
        .ok_or_else(|| AnalyticsError::Calculation(format!("{what} overflows the decimal range")))
}

/// `numerator / denominator` in percent.
///
/// `None` when the denominator is zero or the result does not fit in a `Decimal`.
pub fn percentage(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator
        .checked_div(denominator)?
        .checked_mul(Decimal::ONE_HUNDRED)
}
