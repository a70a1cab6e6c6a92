use crate::error::AnalyticsError;
use crate::history::LotHistory;
use crate::numeric::checked_sum;
use chrono::NaiveDate;
use core_types::{DateRange, LotId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a day's cost per egg could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DailyCostStatus {
    Computed,
    /// No eggs were recorded for the day, so there is nothing to divide the expense by.
    NoData,
}

/// The cost of producing one egg on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCost {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "loteId")]
    pub lot_id: LotId,
    #[serde(rename = "cantidadHuevos")]
    pub units: u64,
    #[serde(rename = "gastoTotalDelDia")]
    pub total_expense: Decimal,
    /// `None` whenever `units` is zero. Never a division by zero.
    #[serde(rename = "costoPorHuevo")]
    pub cost_per_unit: Option<Decimal>,
    #[serde(rename = "estado")]
    pub status: DailyCostStatus,
    /// True when at least one production entry exists for the day, even with zero eggs.
    #[serde(rename = "registroProduccion")]
    pub has_production_record: bool,
}

impl DailyCost {
    fn from_totals(lot_id: LotId, date: NaiveDate, total_expense: Decimal, units: Option<u64>) -> Self {
        let has_production_record = units.is_some();
        let units = units.unwrap_or(0);
        let cost_per_unit = if units > 0 {
            Some(total_expense / Decimal::from(units))
        } else {
            None
        };
        let status = if cost_per_unit.is_some() {
            DailyCostStatus::Computed
        } else {
            DailyCostStatus::NoData
        };

        Self {
            date,
            lot_id,
            units,
            total_expense,
            cost_per_unit,
            status,
            has_production_record,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.status == DailyCostStatus::NoData
    }
}

/// Computes the cost per egg of one day.
///
/// Only Productive-phase expenses count: anything dated before the first egg belongs to
/// the rearing investment and is amortized per bird instead.
pub fn daily_cost(history: &LotHistory, date: NaiveDate) -> Result<DailyCost, AnalyticsError> {
    let total_expense = if history.is_productive_date(date) {
        checked_sum(
            history
                .expenses()
                .iter()
                .filter(|e| e.date == date)
                .map(|e| e.total),
            "daily expense",
        )?
    } else {
        Decimal::ZERO
    };

    let mut recorded = history.production().iter().filter(|p| p.date == date).peekable();
    let units = if recorded.peek().is_some() {
        Some(recorded.map(|p| u64::from(p.units)).sum::<u64>())
    } else {
        None
    };

    Ok(DailyCost::from_totals(history.lot().id, date, total_expense, units))
}

/// Computes a `DailyCost` for every calendar day of `range`, in ascending order.
///
/// Days without any ledger entry still appear, flagged as `NoData`.
pub fn daily_series(history: &LotHistory, range: DateRange) -> Result<Vec<DailyCost>, AnalyticsError> {
    let (expense_by_day, units_by_day) = totals_by_day(history, range)?;
    let lot_id = history.lot().id;
    Ok(range
        .iter_days()
        .map(|date| {
            let total_expense = expense_by_day.get(&date).copied().unwrap_or(Decimal::ZERO);
            DailyCost::from_totals(lot_id, date, total_expense, units_by_day.get(&date).copied())
        })
        .collect())
}

/// Like `daily_series`, but only the days of `range` that carry a production record.
///
/// These are the only days that can have a cost per egg, so the result is bounded by the
/// ledger rather than by the width of the range.
pub fn recorded_days(history: &LotHistory, range: DateRange) -> Result<Vec<DailyCost>, AnalyticsError> {
    let (expense_by_day, units_by_day) = totals_by_day(history, range)?;
    let lot_id = history.lot().id;
    Ok(units_by_day
        .into_iter()
        .map(|(date, units)| {
            let total_expense = expense_by_day.get(&date).copied().unwrap_or(Decimal::ZERO);
            DailyCost::from_totals(lot_id, date, total_expense, Some(units))
        })
        .collect())
}

type DayTotals = (BTreeMap<NaiveDate, Decimal>, BTreeMap<NaiveDate, u64>);

fn totals_by_day(history: &LotHistory, range: DateRange) -> Result<DayTotals, AnalyticsError> {
    let mut expense_by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for entry in history.expenses() {
        if range.contains(entry.date) && history.is_productive_date(entry.date) {
            let total = expense_by_day.entry(entry.date).or_default();
            *total = total.checked_add(entry.total).ok_or_else(|| {
                AnalyticsError::Calculation(format!(
                    "expenses of {} overflow the decimal range",
                    entry.date
                ))
            })?;
        }
    }

    let mut units_by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for entry in history.production() {
        if range.contains(entry.date) {
            *units_by_day.entry(entry.date).or_default() += u64::from(entry.units);
        }
    }
    Ok((expense_by_day, units_by_day))
}
