//! # Eggcost Engine
//!
//! The orchestrator of the cost accounting workspace. It reads a point-in-time copy of a lot's
//! records from the collaborators in `ledger`, runs the calculations in `analytics`, evaluates
//! the `alerter` rules and compiles the results into a `LotReport`.
//!
//! The engine holds no mutable state. Every call re-reads the ledgers, so two calls over an
//! unchanged snapshot return identical results, and calls for different lots may run
//! concurrently without coordination.

use crate::error::EngineError;
use alerter::{Alert, AlertGenerator, AlertInputs};
use analytics::{
    analyze_phases, daily_cost, daily_series, DailyCost, LotHistory, PerformanceStatistics,
    PhaseAnalysis, StatisticsEngine,
};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use configuration::{Config, MAX_WINDOW_DAYS};
use core_types::{DateRange, Lot, LotId};
use ledger::{ExpenseLedger, LotRegistry, ProductionLedger, RevenueSource};
use rust_decimal::Decimal;
use std::sync::Arc;

pub mod error;
pub mod report;
pub mod standards;

pub use report::{LotRanking, LotReport, RankedLot, WindowAnalysis};

/// Computes the unit economics of lots from the farm's ledgers.
#[derive(Clone)]
pub struct CostEngine {
    config: Config,
    registry: Arc<dyn LotRegistry>,
    expenses: Arc<dyn ExpenseLedger>,
    production: Arc<dyn ProductionLedger>,
    revenue: Option<Arc<dyn RevenueSource>>,
    alerts: AlertGenerator,
    statistics: StatisticsEngine,
    as_of: NaiveDate,
}

/// The per-lot figures shared by the statistics call and the full report.
struct Evaluation {
    today: DailyCost,
    previous_day: Option<DailyCost>,
    phases: PhaseAnalysis,
    statistics: PerformanceStatistics,
    alerts: Vec<Alert>,
}

impl CostEngine {
    /// Creates a new `CostEngine` whose "today" is the local calendar date.
    pub fn new(
        config: Config,
        registry: Arc<dyn LotRegistry>,
        expenses: Arc<dyn ExpenseLedger>,
        production: Arc<dyn ProductionLedger>,
    ) -> Result<Self, EngineError> {
        let alerts = AlertGenerator::new(config.alerts.clone())?;
        let statistics = StatisticsEngine::new(config.statistics.trend_threshold_pct);
        Ok(Self {
            config,
            registry,
            expenses,
            production,
            revenue: None,
            alerts,
            statistics,
            as_of: Local::now().date_naive(),
        })
    }

    /// Attaches the sales collaborator used for rentability.
    pub fn with_revenue_source(mut self, revenue: Arc<dyn RevenueSource>) -> Self {
        self.revenue = Some(revenue);
        self
    }

    /// Pins "today". Records dated after it are ignored.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The cost per egg of one day, `date` defaulting to the as-of date.
    pub fn compute_daily_cost(
        &self,
        lot_id: LotId,
        date: Option<NaiveDate>,
    ) -> Result<DailyCost, EngineError> {
        let date = date.unwrap_or(self.as_of);
        let history = self.load_history(lot_id, date.max(self.as_of))?;
        Ok(daily_cost(&history, date)?)
    }

    /// One `DailyCost` per day for the `days` days ending on `end` (default: the as-of date).
    ///
    /// `days` is capped at `MAX_WINDOW_DAYS`.
    pub fn compute_daily_series(
        &self,
        lot_id: LotId,
        end: Option<NaiveDate>,
        days: u32,
    ) -> Result<Vec<DailyCost>, EngineError> {
        let end = end.unwrap_or(self.as_of);
        let range = window_ending_on(end, days)?;
        let history = self.load_history(lot_id, end.max(self.as_of))?;
        Ok(daily_series(&history, range)?)
    }

    /// The Initial/Productive split of the lot's whole history.
    pub fn compute_phase_analysis(&self, lot_id: LotId) -> Result<PhaseAnalysis, EngineError> {
        let history = self.load_history(lot_id, self.as_of)?;
        let revenue = self.revenue_for(lot_id);
        Ok(analyze_phases(&history, revenue)?)
    }

    /// Statistics over the `window_days` ending on the as-of date (default from configuration),
    /// with the alerts they raise. Windows longer than `MAX_WINDOW_DAYS` are rejected.
    pub fn compute_statistics(
        &self,
        lot_id: LotId,
        window_days: Option<u32>,
    ) -> Result<WindowAnalysis, EngineError> {
        let history = self.load_history(lot_id, self.as_of)?;
        let evaluation = self.evaluate(&history, window_days)?;
        Ok(WindowAnalysis {
            statistics: evaluation.statistics,
            alerts: evaluation.alerts,
        })
    }

    /// Compiles the single-lot report. Never touches other lots.
    pub fn compile_report(&self, lot_id: LotId) -> Result<LotReport, EngineError> {
        let history = self.load_history(lot_id, self.as_of)?;
        let evaluation = self.evaluate(&history, None)?;

        tracing::info!(
            %lot_id,
            as_of = %self.as_of,
            alerts = evaluation.alerts.len(),
            "Lot report compiled."
        );

        Ok(LotReport {
            lot: history.lot().clone(),
            as_of: self.as_of,
            daily_cost: evaluation.today,
            previous_day: evaluation.previous_day,
            phases: evaluation.phases,
            statistics: evaluation.statistics,
            alerts: evaluation.alerts,
            ranking: None,
        })
    }

    /// Compiles the report and ranks the lot against every active lot.
    ///
    /// This walks the whole registry. If the registry cannot list the lots, the report is
    /// still returned without its ranking section.
    pub fn compile_report_with_ranking(&self, lot_id: LotId) -> Result<LotReport, EngineError> {
        let mut report = self.compile_report(lot_id)?;
        report.ranking = match self.rank_active_lots() {
            Ok(ranked) => Some(ranking_for(lot_id, &ranked)),
            Err(err) => {
                tracing::warn!(%lot_id, error = %err, "Cross-lot ranking unavailable, omitting it.");
                None
            }
        };
        Ok(report)
    }

    /// Active lots ordered by Productive-phase cost per egg, cheapest first.
    ///
    /// Lots without a cost per egg, or whose history cannot be analyzed, are left out.
    pub fn rank_active_lots(&self) -> Result<Vec<RankedLot>, EngineError> {
        let lots = self.registry.list_active_lots()?;
        let mut ranked = Vec::with_capacity(lots.len());

        for lot in lots {
            let lot_id = lot.id;
            let name = lot.name.clone();
            let analysis = self
                .history_for(lot, self.as_of)
                .and_then(|history| analyze_phases(&history, None).map_err(EngineError::from));
            match analysis {
                Ok(analysis) => {
                    if let Some(cost) = analysis
                        .productive
                        .and_then(|p| p.average_cost_per_unit)
                    {
                        ranked.push(RankedLot {
                            lot_id,
                            name,
                            cost_per_unit: cost,
                        });
                    }
                }
                Err(err) => {
                    tracing::warn!(%lot_id, error = %err, "Skipping lot in ranking.");
                }
            }
        }

        ranked.sort_by(|a, b| {
            a.cost_per_unit
                .cmp(&b.cost_per_unit)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.lot_id.cmp(&b.lot_id))
        });
        Ok(ranked)
    }

    fn evaluate(
        &self,
        history: &LotHistory,
        window_days: Option<u32>,
    ) -> Result<Evaluation, EngineError> {
        let lot_id = history.lot().id;
        let window_days = window_days.unwrap_or(self.config.statistics.window_days);
        let window = window_ending_on(self.as_of, window_days)?;

        let today = daily_cost(history, self.as_of)?;
        let previous_day = self
            .as_of
            .pred_opt()
            .map(|date| daily_cost(history, date))
            .transpose()?;
        let phases = analyze_phases(history, self.revenue_for(lot_id))?;

        let expected =
            standards::expected_units_per_day(&self.config, history.lot(), self.as_of);
        let statistics = self.statistics.calculate(history, window, expected)?;

        let alerts = self.alerts.evaluate(&AlertInputs {
            today: &today,
            previous_day: previous_day.as_ref(),
            phases: &phases,
            statistics: &statistics,
            timestamp: self.alert_timestamp(),
        });

        Ok(Evaluation {
            today,
            previous_day,
            phases,
            statistics,
            alerts,
        })
    }

    fn load_history(&self, lot_id: LotId, through: NaiveDate) -> Result<LotHistory, EngineError> {
        let lot = self.registry.get_lot(lot_id)?;
        self.history_for(lot, through)
    }

    fn history_for(&self, lot: Lot, through: NaiveDate) -> Result<LotHistory, EngineError> {
        let range = DateRange::through(through);
        let expenses = self.expenses.get_expenses(lot.id, range)?;
        let production = self.production.get_production(lot.id, range)?;
        tracing::debug!(
            lot_id = %lot.id,
            expenses = expenses.len(),
            production = production.len(),
            "Ledger snapshot read."
        );
        Ok(LotHistory::new(lot, expenses, production, through))
    }

    /// Revenue is optional: a failing sales collaborator only removes rentability.
    fn revenue_for(&self, lot_id: LotId) -> Option<Decimal> {
        let source = self.revenue.as_ref()?;
        match source.get_revenue(lot_id) {
            Ok(revenue) => revenue,
            Err(err) => {
                tracing::warn!(%lot_id, error = %err, "Revenue unavailable, omitting rentability.");
                None
            }
        }
    }

    fn alert_timestamp(&self) -> DateTime<Utc> {
        self.as_of.and_time(NaiveTime::MIN).and_utc()
    }
}

/// The `days`-long window ending on `end`, rejecting lengths the engine will not materialize.
fn window_ending_on(end: NaiveDate, days: u32) -> Result<DateRange, EngineError> {
    if days > MAX_WINDOW_DAYS {
        return Err(EngineError::InvalidInput(format!(
            "a window of {days} days exceeds the maximum of {MAX_WINDOW_DAYS}"
        )));
    }
    Ok(DateRange::ending_on(end, days)?)
}

fn ranking_for(lot_id: LotId, ranked: &[RankedLot]) -> LotRanking {
    LotRanking {
        position: ranked
            .iter()
            .position(|r| r.lot_id == lot_id)
            .map(|index| index + 1),
        ranked_lots: ranked.len(),
        best_lot: ranked.first().cloned(),
    }
}
