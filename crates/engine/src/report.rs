use alerter::Alert;
use analytics::{DailyCost, PerformanceStatistics, PhaseAnalysis};
use chrono::NaiveDate;
use core_types::{Lot, LotId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Windowed statistics together with the alerts raised for that window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowAnalysis {
    #[serde(rename = "estadisticas")]
    pub statistics: PerformanceStatistics,
    #[serde(rename = "alertas")]
    pub alerts: Vec<Alert>,
}

/// One lot's place in the cross-lot comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedLot {
    #[serde(rename = "loteId")]
    pub lot_id: LotId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "costoPromedioPorHuevo")]
    pub cost_per_unit: Decimal,
}

/// Where a lot's cost per egg stands among all active lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotRanking {
    /// 1-based, cheapest first. `None` if the lot has no cost per egg yet or is not active.
    #[serde(rename = "posicion")]
    pub position: Option<usize>,
    #[serde(rename = "lotesComparados")]
    pub ranked_lots: usize,
    #[serde(rename = "mejorLote")]
    pub best_lot: Option<RankedLot>,
}

/// Everything the engine knows about a lot on its as-of date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotReport {
    #[serde(rename = "lote")]
    pub lot: Lot,
    #[serde(rename = "fechaCorte")]
    pub as_of: NaiveDate,
    #[serde(rename = "costoDiario")]
    pub daily_cost: DailyCost,
    /// `None` only when the as-of date has no previous calendar day.
    #[serde(rename = "costoDiaAnterior", default, skip_serializing_if = "Option::is_none")]
    pub previous_day: Option<DailyCost>,
    #[serde(rename = "analisisFases")]
    pub phases: PhaseAnalysis,
    #[serde(rename = "estadisticas")]
    pub statistics: PerformanceStatistics,
    #[serde(rename = "alertas")]
    pub alerts: Vec<Alert>,
    /// Only present when requested and the registry could list the other lots.
    #[serde(rename = "ranking", default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<LotRanking>,
}
