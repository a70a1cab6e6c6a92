use crate::error::AlerterError;
use analytics::{percentage, CostTrend, DailyCost, PerformanceStatistics, PhaseAnalysis};
use chrono::{DateTime, Utc};
use configuration::AlertThresholds;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod error;

/// The rule that raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// The cost per egg is above the configured maximum.
    #[serde(rename = "COSTO_ALTO")]
    HighCost,
    /// A day's collection fell well below the window average.
    #[serde(rename = "BAJA_PRODUCCION")]
    LowProduction,
    /// Production is below the breed standard.
    #[serde(rename = "INEFICIENCIA")]
    Inefficiency,
    /// Spending jumped from one day to the next.
    #[serde(rename = "INCREMENTO_GASTOS")]
    ExpenseIncrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// An advisory raised by one of the threshold rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "tipo")]
    pub kind: AlertKind,
    #[serde(rename = "severidad")]
    pub severity: Severity,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "accionRecomendada")]
    pub recommended_action: String,
    #[serde(rename = "valorObservado")]
    pub observed_value: Decimal,
    #[serde(rename = "valorReferencia")]
    pub reference_value: Decimal,
    #[serde(rename = "fecha")]
    pub timestamp: DateTime<Utc>,
}

/// The figures the rules are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct AlertInputs<'a> {
    pub today: &'a DailyCost,
    /// The day before `today`, needed for the day-over-day expense rule.
    pub previous_day: Option<&'a DailyCost>,
    pub phases: &'a PhaseAnalysis,
    pub statistics: &'a PerformanceStatistics,
    /// Stamped on every alert. Callers pass the as-of instant so reports stay reproducible.
    pub timestamp: DateTime<Utc>,
}

/// Evaluates the threshold rules for a lot.
///
/// Every rule is independent, so several alerts may be raised at once. A rule whose metric
/// is missing (no eggs, no breed standard, no previous spending) stays silent: the absence
/// of data is never reported as a bad result.
#[derive(Debug, Clone)]
pub struct AlertGenerator {
    thresholds: AlertThresholds,
}

impl AlertGenerator {
    /// Creates a new `AlertGenerator` with the given thresholds.
    pub fn new(thresholds: AlertThresholds) -> Result<Self, AlerterError> {
        if thresholds.max_cost_per_unit <= Decimal::ZERO {
            return Err(AlerterError::InvalidThresholds(
                "max_cost_per_unit must be greater than 0".to_string(),
            ));
        }
        if thresholds.critical_efficiency_factor <= Decimal::ZERO
            || thresholds.critical_efficiency_factor > Decimal::ONE
        {
            return Err(AlerterError::InvalidThresholds(
                "critical_efficiency_factor must be in (0, 1]".to_string(),
            ));
        }
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Runs every rule and returns the alerts raised, in rule order.
    pub fn evaluate(&self, inputs: &AlertInputs<'_>) -> Vec<Alert> {
        let alerts: Vec<Alert> = [
            self.check_cost(inputs),
            self.check_production_drop(inputs),
            self.check_efficiency(inputs),
            self.check_expense_increase(inputs),
        ]
        .into_iter()
        .flatten()
        .collect();

        for alert in &alerts {
            tracing::info!(
                lot_id = %inputs.today.lot_id,
                kind = ?alert.kind,
                severity = ?alert.severity,
                observed = %alert.observed_value,
                reference = %alert.reference_value,
                "Alert raised."
            );
        }
        alerts
    }

    fn check_cost(&self, inputs: &AlertInputs<'_>) -> Option<Alert> {
        let cost = inputs.today.cost_per_unit?;
        let max = self.thresholds.max_cost_per_unit;
        if cost <= max {
            return None;
        }

        let overrun_pct = percent_change(max, cost);
        let severity = if overrun_pct > self.thresholds.critical_cost_overrun_pct {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let phase_average = inputs
            .phases
            .productive
            .as_ref()
            .and_then(|p| p.average_cost_per_unit)
            .map(|avg| format!(" (promedio de la fase productiva: {})", avg.round_dp(4)))
            .unwrap_or_default();

        Some(Alert {
            kind: AlertKind::HighCost,
            severity,
            message: format!(
                "El costo por huevo del {} es {}, {}% sobre el máximo de {}{}.",
                inputs.today.date,
                cost.round_dp(4),
                overrun_pct.round_dp(1),
                max,
                phase_average
            ),
            recommended_action: "Revisar los gastos del día y el consumo de alimento del lote."
                .to_string(),
            observed_value: cost,
            reference_value: max,
            timestamp: inputs.timestamp,
        })
    }

    fn check_production_drop(&self, inputs: &AlertInputs<'_>) -> Option<Alert> {
        let today = inputs.today;
        let average = inputs.statistics.average_units_per_day;
        if !today.has_production_record || average <= Decimal::ZERO {
            return None;
        }

        let units = Decimal::from(today.units);
        let drop_pct = -percent_change(average, units);
        if drop_pct <= self.thresholds.max_production_drop_pct {
            return None;
        }

        Some(Alert {
            kind: AlertKind::LowProduction,
            severity: Severity::Warning,
            message: format!(
                "La producción del {} ({} huevos) está {}% por debajo del promedio de {} huevos/día.",
                today.date,
                today.units,
                drop_pct.round_dp(1),
                average.round_dp(1)
            ),
            recommended_action:
                "Verificar la salud de las aves, el agua, la iluminación y la recolección."
                    .to_string(),
            observed_value: units,
            reference_value: average,
            timestamp: inputs.timestamp,
        })
    }

    fn check_efficiency(&self, inputs: &AlertInputs<'_>) -> Option<Alert> {
        let efficiency = inputs.statistics.efficiency_pct?;
        let min = self.thresholds.min_efficiency_pct;
        if efficiency >= min {
            return None;
        }

        let severity = if efficiency < min * self.thresholds.critical_efficiency_factor {
            Severity::Critical
        } else {
            Severity::Warning
        };

        Some(Alert {
            kind: AlertKind::Inefficiency,
            severity,
            message: format!(
                "La eficiencia de producción es {}%, por debajo del mínimo de {}%.",
                efficiency.round_dp(1),
                min
            ),
            recommended_action:
                "Comparar la postura con el estándar de la raza y revisar nutrición y sanidad."
                    .to_string(),
            observed_value: efficiency,
            reference_value: min,
            timestamp: inputs.timestamp,
        })
    }

    fn check_expense_increase(&self, inputs: &AlertInputs<'_>) -> Option<Alert> {
        let previous = inputs.previous_day?.total_expense;
        if previous <= Decimal::ZERO {
            return None;
        }

        let current = inputs.today.total_expense;
        let increase_pct = percent_change(previous, current);
        if increase_pct <= self.thresholds.max_daily_cost_increase_pct {
            return None;
        }

        let sustained = inputs.statistics.cost_trend == CostTrend::Increasing;
        let severity = if sustained {
            Severity::Warning
        } else {
            Severity::Info
        };

        Some(Alert {
            kind: AlertKind::ExpenseIncrease,
            severity,
            message: format!(
                "El gasto del {} ({}) aumentó {}% respecto al día anterior ({}){}.",
                inputs.today.date,
                current,
                increase_pct.round_dp(1),
                previous,
                if sustained {
                    ", con tendencia de costo en aumento"
                } else {
                    ""
                }
            ),
            recommended_action: "Confirmar que los gastos registrados correspondan al lote."
                .to_string(),
            observed_value: current,
            reference_value: previous,
            timestamp: inputs.timestamp,
        })
    }
}

/// Relative change from a positive `reference` to `value`, in percent.
///
/// Saturates at the `Decimal` bounds instead of overflowing.
fn percent_change(reference: Decimal, value: Decimal) -> Decimal {
    value
        .checked_sub(reference)
        .and_then(|change| percentage(change, reference))
        .unwrap_or(if value > reference {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{DailyCostStatus, InitialPhase};
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    fn day(d: u32, units: u64, expense: Decimal) -> DailyCost {
        DailyCost {
            date: date(d),
            lot_id: Uuid::nil(),
            units,
            total_expense: expense,
            cost_per_unit: (units > 0).then(|| expense / Decimal::from(units)),
            status: if units > 0 {
                DailyCostStatus::Computed
            } else {
                DailyCostStatus::NoData
            },
            has_production_record: true,
        }
    }

    fn no_data_day(d: u32) -> DailyCost {
        DailyCost {
            has_production_record: false,
            ..day(d, 0, Decimal::ZERO)
        }
    }

    fn phases() -> PhaseAnalysis {
        PhaseAnalysis {
            lot_id: Uuid::nil(),
            as_of: date(10),
            boundary_date: None,
            initial: InitialPhase {
                start_date: date(1),
                end_date: date(10),
                duration_days: 9,
                total_cost: Decimal::ZERO,
                cost_per_bird: Decimal::ZERO,
                cost_per_surviving_bird: None,
            },
            productive: None,
            total_lot_cost: Decimal::ZERO,
            lifetime_cost_per_unit: None,
            rentability_pct: None,
        }
    }

    fn stats(average: Decimal, efficiency: Option<Decimal>, trend: CostTrend) -> PerformanceStatistics {
        PerformanceStatistics {
            lot_id: Uuid::nil(),
            period_start: date(1),
            period_end: date(10),
            window_days: 10,
            total_units: 0,
            average_units_per_day: average,
            total_expense: Decimal::ZERO,
            average_daily_expense: Decimal::ZERO,
            average_cost_per_unit: None,
            days_with_cost: 0,
            expected_units_per_day: None,
            efficiency_pct: efficiency,
            laying_rate_pct: None,
            cost_trend: trend,
            expense_breakdown: Vec::new(),
        }
    }

    fn generator() -> AlertGenerator {
        AlertGenerator::new(AlertThresholds::default()).unwrap()
    }

    fn evaluate(
        generator: &AlertGenerator,
        today: &DailyCost,
        previous: Option<&DailyCost>,
        statistics: &PerformanceStatistics,
    ) -> Vec<Alert> {
        let phases = phases();
        generator.evaluate(&AlertInputs {
            today,
            previous_day: previous,
            phases: &phases,
            statistics,
            timestamp: Utc.with_ymd_and_hms(2026, 9, 10, 0, 0, 0).unwrap(),
        })
    }

    #[test]
    fn high_cost_is_warning_then_critical() {
        let generator = generator();
        let stats = stats(dec!(100), None, CostTrend::Stable);

        // 0.30 is 20% above the 0.25 maximum.
        let alerts = evaluate(&generator, &day(10, 100, dec!(30)), None, &stats);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighCost);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].observed_value, dec!(0.3));
        assert_eq!(alerts[0].reference_value, dec!(0.25));

        // 0.40 is 60% above.
        let alerts = evaluate(&generator, &day(10, 100, dec!(40)), None, &stats);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn efficiency_below_minimum_warns() {
        let mut thresholds = AlertThresholds::default();
        thresholds.min_efficiency_pct = dec!(95);
        let generator = AlertGenerator::new(thresholds).unwrap();
        let efficiency = dec!(180) / dec!(190) * dec!(100);
        let stats = stats(dec!(180), Some(efficiency), CostTrend::Stable);

        let alerts = evaluate(&generator, &day(10, 180, dec!(18)), None, &stats);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Inefficiency);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].reference_value, dec!(95));
    }

    #[test]
    fn efficiency_below_half_the_minimum_is_critical() {
        let generator = generator();
        let stats = stats(dec!(180), Some(dec!(40)), CostTrend::Stable);
        let alerts = evaluate(&generator, &day(10, 180, dec!(18)), None, &stats);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn production_drop_beyond_threshold_warns() {
        let generator = generator();
        let stats = stats(dec!(200), None, CostTrend::Stable);

        assert!(evaluate(&generator, &day(10, 175, dec!(10)), None, &stats).is_empty());

        let alerts = evaluate(&generator, &day(10, 160, dec!(10)), None, &stats);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::LowProduction);
        assert_eq!(alerts[0].observed_value, dec!(160));
    }

    #[test]
    fn recorded_zero_collection_is_a_drop_but_missing_record_is_not() {
        let generator = generator();
        let stats = stats(dec!(200), None, CostTrend::Stable);

        let alerts = evaluate(&generator, &day(10, 0, Decimal::ZERO), None, &stats);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::LowProduction);

        assert!(evaluate(&generator, &no_data_day(10), None, &stats).is_empty());
    }

    #[test]
    fn expense_jump_is_info_unless_trend_is_increasing() {
        let generator = generator();
        let yesterday = day(9, 200, dec!(40));
        let today = day(10, 200, dec!(50));

        let stable = stats(dec!(200), None, CostTrend::Stable);
        let alerts = evaluate(&generator, &today, Some(&yesterday), &stable);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::ExpenseIncrease);
        assert_eq!(alerts[0].severity, Severity::Info);

        let rising = stats(dec!(200), None, CostTrend::Increasing);
        let alerts = evaluate(&generator, &today, Some(&yesterday), &rising);
        assert_eq!(alerts[0].severity, Severity::Warning);
    }

    #[test]
    fn no_alerts_without_data() {
        let generator = generator();
        let stats = stats(Decimal::ZERO, None, CostTrend::Increasing);
        let alerts = evaluate(&generator, &no_data_day(10), Some(&no_data_day(9)), &stats);
        assert!(alerts.is_empty());
    }

    #[test]
    fn several_rules_can_fire_together() {
        let generator = generator();
        let stats = stats(dec!(200), Some(dec!(60)), CostTrend::Stable);
        let alerts = evaluate(&generator, &day(10, 100, dec!(40)), None, &stats);
        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AlertKind::HighCost, AlertKind::LowProduction, AlertKind::Inefficiency]
        );
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let mut thresholds = AlertThresholds::default();
        thresholds.max_cost_per_unit = Decimal::ZERO;
        assert!(matches!(
            AlertGenerator::new(thresholds),
            Err(AlerterError::InvalidThresholds(_))
        ));
    }

    #[test]
    fn serializes_with_original_tags() {
        let generator = generator();
        let stats = stats(dec!(100), None, CostTrend::Stable);
        let alerts = evaluate(&generator, &day(10, 100, dec!(40)), None, &stats);
        let json = serde_json::to_value(&alerts[0]).unwrap();
        assert_eq!(json["tipo"], "COSTO_ALTO");
        assert_eq!(json["severidad"], "CRITICAL");
    }

    #[test]
    fn huge_cost_saturates_into_a_critical_alert() {
        let generator = generator();
        let stats = stats(Decimal::ZERO, None, CostTrend::Stable);
        let alerts = evaluate(&generator, &day(10, 1, Decimal::MAX), None, &stats);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighCost);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].observed_value, Decimal::MAX);
    }

    #[test]
    fn changes_against_tiny_references_do_not_overflow() {
        let generator = generator();
        let tiny = Decimal::new(1, 28);

        // A collection far above a near-zero average is not a drop.
        let near_zero = stats(tiny, None, CostTrend::Stable);
        let alerts = evaluate(&generator, &day(10, 1_000_000, Decimal::ZERO), None, &near_zero);
        assert!(alerts.is_empty());

        let flat = stats(Decimal::ZERO, None, CostTrend::Stable);
        let yesterday = day(9, 0, tiny);
        let alerts = evaluate(&generator, &day(10, 0, Decimal::MAX), Some(&yesterday), &flat);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::ExpenseIncrease);
        assert_eq!(alerts[0].severity, Severity::Info);
    }

    #[test]
    fn percent_change_saturates() {
        assert_eq!(percent_change(dec!(40), dec!(50)), dec!(25));
        assert_eq!(percent_change(Decimal::new(1, 28), Decimal::MAX), Decimal::MAX);
        assert_eq!(percent_change(Decimal::MAX, Decimal::MIN), Decimal::MIN);
    }
}
