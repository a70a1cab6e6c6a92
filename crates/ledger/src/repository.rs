use crate::LedgerError;
use core_types::{DateRange, ExpenseEntry, Lot, LotId, ProductionEntry};
use rust_decimal::Decimal;

/// Identity and flock data for every lot on the farm.
pub trait LotRegistry: Send + Sync {
    /// Fetches a lot, failing with `LedgerError::NotFound` if the id is unknown.
    fn get_lot(&self, lot_id: LotId) -> Result<Lot, LedgerError>;

    /// Lists every lot that has not been finalized.
    fn list_active_lots(&self) -> Result<Vec<Lot>, LedgerError>;
}

/// The append-only store of dated expenses.
pub trait ExpenseLedger: Send + Sync {
    /// Returns the lot's expenses dated within `range`, in ascending date order.
    fn get_expenses(&self, lot_id: LotId, range: DateRange) -> Result<Vec<ExpenseEntry>, LedgerError>;
}

/// The append-only store of daily egg collections.
pub trait ProductionLedger: Send + Sync {
    /// Returns the lot's production entries dated within `range`, in ascending date order.
    fn get_production(
        &self,
        lot_id: LotId,
        range: DateRange,
    ) -> Result<Vec<ProductionEntry>, LedgerError>;
}

/// The sales side of the farm, used only to measure rentability.
pub trait RevenueSource: Send + Sync {
    /// Total revenue attributed to the lot, or `None` if no sales are known for it.
    fn get_revenue(&self, lot_id: LotId) -> Result<Option<Decimal>, LedgerError>;
}
