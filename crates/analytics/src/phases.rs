use crate::daily::{recorded_days, DailyCost};
use crate::error::AnalyticsError;
use crate::history::LotHistory;
use crate::numeric::{checked_sum, percentage};
use chrono::NaiveDate;
use core_types::{DateRange, LotId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rearing period: everything spent before the first egg, amortized per bird.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialPhase {
    #[serde(rename = "fechaInicio")]
    pub start_date: NaiveDate,
    /// The phase boundary, or the as-of date while the lot has not started laying.
    #[serde(rename = "fechaFin")]
    pub end_date: NaiveDate,
    #[serde(rename = "duracionDias")]
    pub duration_days: i64,
    #[serde(rename = "costoTotal")]
    pub total_cost: Decimal,
    /// Total cost divided by the birds housed at the start of the lot.
    #[serde(rename = "costoUnitario")]
    pub cost_per_bird: Decimal,
    /// Total cost divided by the birds still alive, `None` once the flock is gone.
    #[serde(rename = "costoPorAveActual")]
    pub cost_per_surviving_bird: Option<Decimal>,
}

/// Laying period: maintenance spending amortized over the eggs collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductivePhase {
    #[serde(rename = "fechaInicio")]
    pub start_date: NaiveDate,
    #[serde(rename = "duracionDias")]
    pub duration_days: i64,
    #[serde(rename = "totalHuevosProducidos")]
    pub total_units: u64,
    #[serde(rename = "gastoTotalMantenimiento")]
    pub total_expense: Decimal,
    #[serde(rename = "costoPromedioPorHuevo")]
    pub average_cost_per_unit: Option<Decimal>,
    #[serde(rename = "mejorDia")]
    pub best_day: Option<DailyCost>,
    #[serde(rename = "peorDia")]
    pub worst_day: Option<DailyCost>,
}

/// The economics of a lot split at its Initial/Productive boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAnalysis {
    #[serde(rename = "loteId")]
    pub lot_id: LotId,
    #[serde(rename = "fechaCorte")]
    pub as_of: NaiveDate,
    #[serde(rename = "fechaInicioProduccion")]
    pub boundary_date: Option<NaiveDate>,
    #[serde(rename = "faseInicial")]
    pub initial: InitialPhase,
    /// Absent until the lot lays its first egg.
    #[serde(rename = "faseProductiva")]
    pub productive: Option<ProductivePhase>,
    /// Initial-phase cost plus Productive-phase expense.
    #[serde(rename = "costoTotalLote")]
    pub total_lot_cost: Decimal,
    #[serde(rename = "costoPorHuevoTotal")]
    pub lifetime_cost_per_unit: Option<Decimal>,
    /// Percentage return over the lot's lifetime cost. Omitted when revenue is unknown.
    #[serde(rename = "rentabilidad")]
    pub rentability_pct: Option<Decimal>,
}

impl PhaseAnalysis {
    pub fn productive_expense(&self) -> Decimal {
        self.productive
            .as_ref()
            .map_or(Decimal::ZERO, |p| p.total_expense)
    }

    pub fn total_units(&self) -> u64 {
        self.productive.as_ref().map_or(0, |p| p.total_units)
    }
}

/// Splits the lot's history at its first egg and computes the unit economics of each phase.
///
/// `revenue` is the lot's total sales, if the sales collaborator knows them.
pub fn analyze_phases(
    history: &LotHistory,
    revenue: Option<Decimal>,
) -> Result<PhaseAnalysis, AnalyticsError> {
    let lot = history.lot();
    if lot.initial_bird_count == 0 {
        return Err(AnalyticsError::InvalidState(format!(
            "lot {} has no starting birds, the Initial-phase cost per bird is undefined",
            lot.id
        )));
    }

    let boundary = history.phase_boundary();
    let as_of = history.as_of();

    let (productive_entries, initial_entries): (Vec<_>, Vec<_>) = history
        .expenses()
        .iter()
        .partition(|e| history.is_productive_date(e.date));
    let initial_cost = checked_sum(initial_entries.iter().map(|e| e.total), "Initial-phase cost")?;
    let productive_cost =
        checked_sum(productive_entries.iter().map(|e| e.total), "Productive-phase expense")?;

    let initial_end = boundary.unwrap_or(as_of);
    let initial = InitialPhase {
        start_date: lot.start_date,
        end_date: initial_end,
        duration_days: (initial_end - lot.start_date).num_days().max(0),
        total_cost: initial_cost,
        cost_per_bird: initial_cost / Decimal::from(lot.initial_bird_count),
        cost_per_surviving_bird: (lot.current_bird_count > 0)
            .then(|| initial_cost / Decimal::from(lot.current_bird_count)),
    };

    let productive = boundary
        .map(|start| productive_phase(history, start, productive_cost))
        .transpose()?;
    let total_units = productive.as_ref().map_or(0, |p| p.total_units);

    let total_lot_cost = checked_sum([initial_cost, productive_cost], "lot cost")?;
    let lifetime_cost_per_unit =
        (total_units > 0).then(|| total_lot_cost / Decimal::from(total_units));
    let rentability_pct = revenue
        .filter(|_| total_lot_cost > Decimal::ZERO)
        .and_then(|revenue| revenue.checked_sub(total_lot_cost))
        .and_then(|margin| percentage(margin, total_lot_cost));

    tracing::debug!(
        lot_id = %lot.id,
        boundary = ?boundary,
        %initial_cost,
        %productive_cost,
        total_units,
        "Phase analysis computed."
    );

    Ok(PhaseAnalysis {
        lot_id: lot.id,
        as_of,
        boundary_date: boundary,
        initial,
        productive,
        total_lot_cost,
        lifetime_cost_per_unit,
        rentability_pct,
    })
}

fn productive_phase(
    history: &LotHistory,
    start: NaiveDate,
    total_expense: Decimal,
) -> Result<ProductivePhase, AnalyticsError> {
    let total_units: u64 = history
        .production()
        .iter()
        .filter(|p| p.date >= start)
        .map(|p| u64::from(p.units))
        .sum();

    let as_of = history.as_of();
    let days = recorded_days(history, DateRange { start, end: as_of })?;
    let (best_day, worst_day) = best_and_worst(&days);

    Ok(ProductivePhase {
        start_date: start,
        duration_days: (as_of - start).num_days() + 1,
        total_units,
        total_expense,
        average_cost_per_unit: (total_units > 0)
            .then(|| total_expense / Decimal::from(total_units)),
        best_day,
        worst_day,
    })
}

/// The cheapest and the most expensive day of a date-ordered series.
///
/// Days without a cost are skipped; on ties the earliest day wins.
fn best_and_worst(series: &[DailyCost]) -> (Option<DailyCost>, Option<DailyCost>) {
    let mut best: Option<(&DailyCost, Decimal)> = None;
    let mut worst: Option<(&DailyCost, Decimal)> = None;

    for day in series {
        let Some(cost) = day.cost_per_unit else {
            continue;
        };
        if best.is_none_or(|(_, lowest)| cost < lowest) {
            best = Some((day, cost));
        }
        if worst.is_none_or(|(_, highest)| cost > highest) {
            worst = Some((day, cost));
        }
    }

    (best.map(|(d, _)| d.clone()), worst.map(|(d, _)| d.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{ExpenseCategory, ExpenseEntry, Lot, LotStatus, ProductionEntry};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn lot(initial_birds: u32) -> Lot {
        Lot {
            id: Uuid::new_v4(),
            name: "Galpon 4".to_string(),
            breed: "Lohmann Brown".to_string(),
            initial_bird_count: initial_birds,
            current_bird_count: initial_birds,
            start_date: date(1, 1),
            birth_date: date(1, 1),
            status: LotStatus::Active,
        }
    }

    fn expense(lot: &Lot, when: NaiveDate, amount: Decimal) -> ExpenseEntry {
        ExpenseEntry::new(lot.id, when, ExpenseCategory::Feed, dec!(1), amount, "").unwrap()
    }

    #[test]
    fn initial_cost_is_amortized_per_starting_bird() {
        let lot = lot(100);
        let history = LotHistory::new(
            lot.clone(),
            vec![expense(&lot, date(1, 5), dec!(1000)), expense(&lot, date(2, 5), dec!(500))],
            Vec::new(),
            date(3, 1),
        );

        let analysis = analyze_phases(&history, None).unwrap();
        assert_eq!(analysis.initial.total_cost, dec!(1500.00));
        assert_eq!(analysis.initial.cost_per_bird, dec!(15.00));
        assert_eq!(analysis.initial.end_date, date(3, 1));
        assert_eq!(analysis.initial.duration_days, 59);
    }

    #[test]
    fn lot_without_eggs_has_no_productive_phase() {
        let lot = lot(100);
        let history = LotHistory::new(
            lot.clone(),
            vec![expense(&lot, date(1, 5), dec!(300))],
            vec![ProductionEntry::new(lot.id, date(2, 1), 0)],
            date(3, 1),
        );

        let analysis = analyze_phases(&history, Some(dec!(50))).unwrap();
        assert!(analysis.productive.is_none());
        assert!(analysis.boundary_date.is_none());
        assert_eq!(analysis.total_lot_cost, dec!(300));
        assert_eq!(analysis.lifetime_cost_per_unit, None);
        assert_eq!(analysis.rentability_pct.map(|r| r.round_dp(2)), Some(dec!(-83.33)));
    }

    #[test]
    fn expenses_are_attributed_to_exactly_one_phase() {
        let lot = lot(200);
        let boundary = date(5, 10);
        let history = LotHistory::new(
            lot.clone(),
            vec![
                expense(&lot, date(5, 9), dec!(700)),
                expense(&lot, boundary, dec!(40)),
                expense(&lot, date(5, 11), dec!(60)),
            ],
            vec![
                ProductionEntry::new(lot.id, date(5, 8), 0),
                ProductionEntry::new(lot.id, boundary, 100),
                ProductionEntry::new(lot.id, date(5, 11), 150),
            ],
            date(5, 11),
        );

        let analysis = analyze_phases(&history, None).unwrap();
        let productive = analysis.productive.as_ref().unwrap();
        assert_eq!(analysis.boundary_date, Some(boundary));
        assert_eq!(analysis.initial.total_cost, dec!(700));
        assert_eq!(productive.total_expense, dec!(100));
        assert_eq!(productive.total_units, 250);
        assert_eq!(productive.average_cost_per_unit, Some(dec!(0.4)));
        assert_eq!(productive.duration_days, 2);
        assert_eq!(
            analysis.total_lot_cost,
            analysis.initial.total_cost + productive.total_expense
        );
        assert_eq!(analysis.lifetime_cost_per_unit, Some(dec!(3.2)));
    }

    #[test]
    fn best_and_worst_days_skip_missing_costs_and_prefer_earliest() {
        let lot = lot(200);
        let history = LotHistory::new(
            lot.clone(),
            vec![
                expense(&lot, date(6, 1), dec!(20)),
                expense(&lot, date(6, 2), dec!(50)),
                expense(&lot, date(6, 3), dec!(20)),
                expense(&lot, date(6, 4), dec!(80)),
                expense(&lot, date(6, 5), dec!(50)),
            ],
            vec![
                ProductionEntry::new(lot.id, date(6, 1), 100),
                ProductionEntry::new(lot.id, date(6, 2), 100),
                ProductionEntry::new(lot.id, date(6, 3), 100),
                ProductionEntry::new(lot.id, date(6, 4), 0),
                ProductionEntry::new(lot.id, date(6, 5), 100),
            ],
            date(6, 6),
        );

        let analysis = analyze_phases(&history, None).unwrap();
        let productive = analysis.productive.unwrap();
        let best = productive.best_day.unwrap();
        let worst = productive.worst_day.unwrap();
        assert_eq!(best.date, date(6, 1));
        assert_eq!(best.cost_per_unit, Some(dec!(0.2)));
        assert_eq!(worst.date, date(6, 2));
        assert_eq!(worst.cost_per_unit, Some(dec!(0.5)));
    }

    #[test]
    fn rentability_requires_revenue() {
        let lot = lot(10);
        let history = LotHistory::new(
            lot.clone(),
            vec![expense(&lot, date(4, 1), dec!(100)), expense(&lot, date(4, 2), dec!(100))],
            vec![ProductionEntry::new(lot.id, date(4, 2), 100)],
            date(4, 2),
        );

        let without = analyze_phases(&history, None).unwrap();
        assert_eq!(without.rentability_pct, None);

        let with = analyze_phases(&history, Some(dec!(250))).unwrap();
        assert_eq!(with.rentability_pct, Some(dec!(25)));
    }

    #[test]
    fn lot_without_starting_birds_is_invalid() {
        let lot = lot(0);
        let history = LotHistory::new(lot, Vec::new(), Vec::new(), date(2, 1));
        assert!(matches!(
            analyze_phases(&history, None),
            Err(AnalyticsError::InvalidState(_))
        ));
    }

    #[test]
    fn rentability_beyond_decimal_range_is_omitted() {
        let lot = lot(10);
        let history = LotHistory::new(
            lot.clone(),
            vec![expense(&lot, date(4, 2), dec!(0.0001))],
            vec![ProductionEntry::new(lot.id, date(4, 2), 10)],
            date(4, 2),
        );
        let revenue = Decimal::from_i128_with_scale(10_i128.pow(24), 0);

        let analysis = analyze_phases(&history, Some(revenue)).unwrap();
        assert_eq!(analysis.rentability_pct, None);
        assert_eq!(analysis.total_lot_cost, dec!(0.0001));
    }

    #[test]
    fn lot_cost_past_decimal_range_is_a_calculation_error() {
        let lot = lot(10);
        let history = LotHistory::new(
            lot.clone(),
            vec![
                expense(&lot, date(4, 1), Decimal::MAX),
                expense(&lot, date(4, 2), Decimal::MAX),
            ],
            vec![ProductionEntry::new(lot.id, date(4, 2), 10)],
            date(4, 2),
        );

        assert!(matches!(
            analyze_phases(&history, None),
            Err(AnalyticsError::Calculation(_))
        ));
    }
}
