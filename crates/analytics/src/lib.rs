//! # Eggcost Analytics Engine
//!
//! This crate turns a lot's raw expense and production records into its unit economics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of where the records
//!   come from. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every calculation takes a `LotHistory` snapshot and returns
//!   a new derived record. Nothing is cached or mutated, so the same snapshot always
//!   produces the same figures.
//! - **No Numeric Faults:** Every division is guarded. Figures that would need a division by
//!   zero, or whose ratio leaves the `Decimal` range, are `None` instead. Totals that overflow
//!   are reported as `AnalyticsError::Calculation`.
//!
//! ## Public API
//!
//! - `LotHistory`: a lot and its ledger entries frozen at an as-of date.
//! - `daily_cost` / `daily_series`: the Daily Cost Calculator.
//! - `analyze_phases`: the Phase Partitioner, producing a `PhaseAnalysis`.
//! - `StatisticsEngine`: windowed `PerformanceStatistics` and the `CostTrend`.
//! - `percentage`: the overflow-safe ratio shared with the alert rules.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod daily;
pub mod error;
pub mod history;
pub mod numeric;
pub mod phases;
pub mod statistics;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use daily::{daily_cost, daily_series, recorded_days, DailyCost, DailyCostStatus};
pub use error::AnalyticsError;
pub use history::{phase_boundary, LotHistory};
pub use numeric::percentage;
pub use phases::{analyze_phases, InitialPhase, PhaseAnalysis, ProductivePhase};
pub use statistics::{CategoryExpense, PerformanceStatistics, StatisticsEngine};
pub use trend::{classify_trend, CostTrend};
