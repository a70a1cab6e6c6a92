//! # Eggcost Ledger Crate
//!
//! The read-only boundary between the cost engine and the systems that own the
//! farm's records.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Adapter:** The lot registry, the expense and production ledgers and the
//!   sales collaborator are external systems. This crate describes what the engine needs
//!   from each of them as a trait, so the engine never sees how records are stored.
//! - **Read Only:** No trait here can create, edit or delete a record. Every call returns
//!   a point-in-time copy that the calculations may consume freely.
//! - **Snapshots:** `Snapshot` implements every trait over an in-memory copy of the records,
//!   loaded from a JSON export or assembled in tests.
//!
//! ## Public API
//!
//! - `LotRegistry`, `ExpenseLedger`, `ProductionLedger`, `RevenueSource`: the collaborator contracts.
//! - `Snapshot`: the in-memory implementation of all four.
//! - `LedgerError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod repository;
pub mod snapshot;

// Re-export the key components to create a clean, public-facing API.
pub use error::LedgerError;
pub use repository::{ExpenseLedger, LotRegistry, ProductionLedger, RevenueSource};
pub use snapshot::Snapshot;
