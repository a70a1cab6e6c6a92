use chrono::NaiveDate;
use configuration::Config;
use core_types::Lot;
use rust_decimal::Decimal;

/// Theoretical eggs per day for the lot on `date`.
///
/// The breed's laying rate at the lot's age, applied to the birds alive today. `None` when
/// the breed has no configured curve or the birds are younger than its first point.
pub fn expected_units_per_day(config: &Config, lot: &Lot, date: NaiveDate) -> Option<Decimal> {
    let standard = config.breed(&lot.breed)?;
    let age_weeks = lot.age_in_weeks(date)?;
    let rate_pct = standard.rate_at_week(age_weeks)?;
    Some(rate_pct * Decimal::from(lot.current_bird_count) / Decimal::ONE_HUNDRED)
}
