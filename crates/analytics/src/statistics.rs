use crate::daily::recorded_days;
use crate::error::AnalyticsError;
use crate::history::LotHistory;
use crate::numeric::{checked_sum, percentage};
use crate::trend::{classify_trend, mean, CostTrend};
use chrono::NaiveDate;
use core_types::{DateRange, ExpenseCategory, LotId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Spending of one category within the analysis window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryExpense {
    #[serde(rename = "categoria")]
    pub category: ExpenseCategory,
    #[serde(rename = "total")]
    pub total: Decimal,
}

/// Aggregates over a rolling window of a lot's ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceStatistics {
    #[serde(rename = "loteId")]
    pub lot_id: LotId,
    #[serde(rename = "fechaInicio")]
    pub period_start: NaiveDate,
    #[serde(rename = "fechaFin")]
    pub period_end: NaiveDate,
    #[serde(rename = "diasPeriodo")]
    pub window_days: i64,
    #[serde(rename = "totalHuevos")]
    pub total_units: u64,
    /// Total units over the window length; days without entries count as zero.
    #[serde(rename = "promedioHuevosDiarios")]
    pub average_units_per_day: Decimal,
    #[serde(rename = "gastoTotal")]
    pub total_expense: Decimal,
    #[serde(rename = "gastoPromedioDiario")]
    pub average_daily_expense: Decimal,
    /// Mean of the days that have a cost per egg.
    #[serde(rename = "costoPromedioPorHuevo")]
    pub average_cost_per_unit: Option<Decimal>,
    #[serde(rename = "diasConCosto")]
    pub days_with_cost: usize,
    #[serde(rename = "produccionTeoricaDiaria")]
    pub expected_units_per_day: Option<Decimal>,
    /// Actual over expected production, in percent.
    #[serde(rename = "eficienciaProduccion")]
    pub efficiency_pct: Option<Decimal>,
    /// Eggs per hundred live birds per day.
    #[serde(rename = "porcentajePostura")]
    pub laying_rate_pct: Option<Decimal>,
    #[serde(rename = "tendenciaCosto")]
    pub cost_trend: CostTrend,
    #[serde(rename = "gastosPorCategoria")]
    pub expense_breakdown: Vec<CategoryExpense>,
}

/// A stateless calculator for the windowed production statistics of a lot.
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    trend_threshold_pct: Decimal,
}

impl StatisticsEngine {
    pub fn new(trend_threshold_pct: Decimal) -> Self {
        Self { trend_threshold_pct }
    }

    /// Calculates the statistics of `window`.
    ///
    /// # Arguments
    ///
    /// * `history` - The lot and its ledger entries.
    /// * `window` - The inclusive range of days to aggregate.
    /// * `expected_units_per_day` - The breed-standard production for the lot's current
    ///   age and bird count, if known. Without it the efficiency ratio is `None`.
    pub fn calculate(
        &self,
        history: &LotHistory,
        window: DateRange,
        expected_units_per_day: Option<Decimal>,
    ) -> Result<PerformanceStatistics, AnalyticsError> {
        let lot = history.lot();
        let days = Decimal::from(window.num_days());

        let total_units: u64 = history
            .production()
            .iter()
            .filter(|p| window.contains(p.date))
            .map(|p| u64::from(p.units))
            .sum();
        let average_units_per_day = Decimal::from(total_units) / days;

        let mut by_category: BTreeMap<ExpenseCategory, Decimal> = BTreeMap::new();
        for entry in history.expenses().iter().filter(|e| window.contains(e.date)) {
            let total = by_category.entry(entry.category).or_default();
            *total = checked_sum([*total, entry.total], entry.category.label())?;
        }
        let total_expense = checked_sum(by_category.values().copied(), "window expense")?;
        let expense_breakdown = by_category
            .into_iter()
            .map(|(category, total)| CategoryExpense { category, total })
            .collect();

        let costs: Vec<Decimal> = recorded_days(history, window)?
            .iter()
            .filter_map(|d| d.cost_per_unit)
            .collect();

        let efficiency_pct = expected_units_per_day
            .filter(|expected| *expected > Decimal::ZERO)
            .and_then(|expected| percentage(average_units_per_day, expected));
        let laying_rate_pct = (lot.current_bird_count > 0)
            .then(|| percentage(average_units_per_day, Decimal::from(lot.current_bird_count)))
            .flatten();

        let cost_trend = classify_trend(&costs, self.trend_threshold_pct);
        tracing::debug!(
            lot_id = %lot.id,
            start = %window.start,
            end = %window.end,
            total_units,
            cost_days = costs.len(),
            trend = ?cost_trend,
            "Window statistics computed."
        );

        Ok(PerformanceStatistics {
            lot_id: lot.id,
            period_start: window.start,
            period_end: window.end,
            window_days: window.num_days(),
            total_units,
            average_units_per_day,
            total_expense,
            average_daily_expense: total_expense / days,
            average_cost_per_unit: mean(&costs),
            days_with_cost: costs.len(),
            expected_units_per_day,
            efficiency_pct,
            laying_rate_pct,
            cost_trend,
            expense_breakdown,
        })
    }
}
