//! # Eggcost Core Types
//!
//! The shared vocabulary of the workspace: lots, the ledger entries recorded
//! against them, and the date ranges used to query the ledgers.
//!
//! As a Layer 0 crate it has no knowledge of storage, configuration or the
//! calculations built on top of these records.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ExpenseCategory, LotStatus};
pub use error::CoreError;
pub use structs::{DateRange, ExpenseEntry, Lot, LotId, ProductionEntry};
