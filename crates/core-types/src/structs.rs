use crate::enums::{ExpenseCategory, LotStatus};
use crate::error::CoreError;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a lot in the lot registry.
pub type LotId = Uuid;

/// A cohort of birds managed as one unit of production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub name: String,
    pub breed: String,
    /// Number of birds housed when the lot was started.
    pub initial_bird_count: u32,
    /// Number of birds alive today (after mortality).
    pub current_bird_count: u32,
    pub start_date: NaiveDate,
    pub birth_date: NaiveDate,
    pub status: LotStatus,
}

impl Lot {
    /// Age of the birds in whole weeks on `date`, or `None` before the birth date.
    pub fn age_in_weeks(&self, date: NaiveDate) -> Option<u32> {
        let days = (date - self.birth_date).num_days();
        if days < 0 {
            return None;
        }
        u32::try_from(days / 7).ok()
    }
}

/// A single dated expense recorded against a lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: Uuid,
    pub lot_id: LotId,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub description: String,
}

impl ExpenseEntry {
    /// Builds an entry whose total is `quantity * unit_price`.
    pub fn new(
        lot_id: LotId,
        date: NaiveDate,
        category: ExpenseCategory,
        quantity: Decimal,
        unit_price: Decimal,
        description: impl Into<String>,
    ) -> Result<Self, CoreError> {
        if quantity.is_sign_negative() {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                format!("must not be negative, got {quantity}"),
            ));
        }
        if unit_price.is_sign_negative() {
            return Err(CoreError::InvalidInput(
                "unit_price".to_string(),
                format!("must not be negative, got {unit_price}"),
            ));
        }
        let total = quantity.checked_mul(unit_price).ok_or_else(|| {
            CoreError::Calculation(format!("{quantity} x {unit_price} overflows"))
        })?;

        Ok(Self {
            id: Uuid::new_v4(),
            lot_id,
            date,
            category,
            quantity,
            unit_price,
            total,
            description: description.into(),
        })
    }
}

/// Eggs collected for a lot on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionEntry {
    pub id: Uuid,
    pub lot_id: LotId,
    pub date: NaiveDate,
    pub units: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProductionEntry {
    pub fn new(lot_id: LotId, date: NaiveDate, units: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            lot_id,
            date,
            units,
            notes: None,
        }
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::InvalidInput(
                "date range".to_string(),
                format!("end {end} is before start {start}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// A single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// Every day up to and including `end`.
    pub fn through(end: NaiveDate) -> Self {
        Self {
            start: NaiveDate::MIN,
            end,
        }
    }

    /// The `days`-long window that finishes on `end`. A zero-length window is rejected.
    pub fn ending_on(end: NaiveDate, days: u32) -> Result<Self, CoreError> {
        if days == 0 {
            return Err(CoreError::InvalidInput(
                "window".to_string(),
                "must cover at least one day".to_string(),
            ));
        }
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .ok_or_else(|| CoreError::Calculation(format!("{days} days before {end}")))?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates over every day of the range in ascending order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expense_total_is_quantity_times_price() {
        let entry = ExpenseEntry::new(
            Uuid::new_v4(),
            date(2026, 3, 1),
            ExpenseCategory::Feed,
            dec!(12.5),
            dec!(3.20),
            "layer mash",
        )
        .unwrap();
        assert_eq!(entry.total, dec!(40.00));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let result = ExpenseEntry::new(
            Uuid::new_v4(),
            date(2026, 3, 1),
            ExpenseCategory::Feed,
            dec!(-1),
            dec!(3),
            "",
        );
        assert!(matches!(result, Err(CoreError::InvalidInput(field, _)) if field == "quantity"));
    }

    #[test]
    fn window_ending_on_covers_requested_days() {
        let range = DateRange::ending_on(date(2026, 3, 30), 30).unwrap();
        assert_eq!(range.start, date(2026, 3, 1));
        assert_eq!(range.num_days(), 30);
        assert_eq!(range.iter_days().count(), 30);
        assert!(range.contains(date(2026, 3, 15)));
        assert!(!range.contains(date(2026, 2, 28)));
    }

    #[test]
    fn zero_day_window_is_rejected() {
        assert!(DateRange::ending_on(date(2026, 3, 30), 0).is_err());
        assert!(DateRange::new(date(2026, 3, 2), date(2026, 3, 1)).is_err());
    }

    #[test]
    fn age_in_weeks_counts_completed_weeks() {
        let lot = Lot {
            id: Uuid::new_v4(),
            name: "Galpon 1".to_string(),
            breed: "Hy-Line Brown".to_string(),
            initial_bird_count: 100,
            current_bird_count: 98,
            start_date: date(2026, 1, 1),
            birth_date: date(2026, 1, 1),
            status: LotStatus::Active,
        };
        assert_eq!(lot.age_in_weeks(date(2026, 1, 14)), Some(1));
        assert_eq!(lot.age_in_weeks(date(2026, 1, 15)), Some(2));
        assert_eq!(lot.age_in_weeks(date(2025, 12, 31)), None);
    }

    #[test]
    fn production_entry_reads_iso_dates() {
        let json = r#"{
            "id": "6f1c9c43-5a8c-4d59-9a57-1f7b0e0e8c11",
            "lot_id": "0b7d1f0e-4c0a-4c5e-8f0a-51a9b4b2e0d2",
            "date": "2026-04-02",
            "units": 180
        }"#;
        let entry: ProductionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, date(2026, 4, 2));
        assert_eq!(entry.units, 180);
        assert!(entry.notes.is_none());
    }
}
