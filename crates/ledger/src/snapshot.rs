use crate::repository::{ExpenseLedger, LotRegistry, ProductionLedger, RevenueSource};
use crate::LedgerError;
use core_types::{DateRange, ExpenseEntry, Lot, LotId, ProductionEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A point-in-time copy of the registry and the ledgers.
///
/// Snapshots are serialized as a single JSON document:
///
/// ```json
/// {
///   "lots": [ { "id": "...", "name": "Galpon 1", ... } ],
///   "expenses": [ { "lot_id": "...", "date": "2026-03-01", "total": "40.00", ... } ],
///   "production": [ { "lot_id": "...", "date": "2026-03-01", "units": 200 } ],
///   "revenue": { "<lot id>": "5120.00" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub lots: Vec<Lot>,
    pub expenses: Vec<ExpenseEntry>,
    pub production: Vec<ProductionEntry>,
    pub revenue: BTreeMap<LotId, Decimal>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a snapshot previously exported as JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            lots = snapshot.lots.len(),
            expenses = snapshot.expenses.len(),
            production = snapshot.production.len(),
            "Ledger snapshot loaded."
        );
        Ok(snapshot)
    }

    pub fn with_lot(mut self, lot: Lot) -> Self {
        self.lots.push(lot);
        self
    }

    pub fn with_expense(mut self, entry: ExpenseEntry) -> Self {
        self.expenses.push(entry);
        self
    }

    pub fn with_production(mut self, entry: ProductionEntry) -> Self {
        self.production.push(entry);
        self
    }

    pub fn with_revenue(mut self, lot_id: LotId, amount: Decimal) -> Self {
        self.revenue.insert(lot_id, amount);
        self
    }
}

impl LotRegistry for Snapshot {
    fn get_lot(&self, lot_id: LotId) -> Result<Lot, LedgerError> {
        self.lots
            .iter()
            .find(|lot| lot.id == lot_id)
            .cloned()
            .ok_or(LedgerError::NotFound(lot_id))
    }

    fn list_active_lots(&self) -> Result<Vec<Lot>, LedgerError> {
        Ok(self
            .lots
            .iter()
            .filter(|lot| lot.status.is_active())
            .cloned()
            .collect())
    }
}

impl ExpenseLedger for Snapshot {
    fn get_expenses(&self, lot_id: LotId, range: DateRange) -> Result<Vec<ExpenseEntry>, LedgerError> {
        let mut entries: Vec<ExpenseEntry> = self
            .expenses
            .iter()
            .filter(|e| e.lot_id == lot_id && range.contains(e.date))
            .cloned()
            .collect();
        // Stable sort keeps the recording order for entries on the same day.
        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }
}

impl ProductionLedger for Snapshot {
    fn get_production(
        &self,
        lot_id: LotId,
        range: DateRange,
    ) -> Result<Vec<ProductionEntry>, LedgerError> {
        let mut entries: Vec<ProductionEntry> = self
            .production
            .iter()
            .filter(|p| p.lot_id == lot_id && range.contains(p.date))
            .cloned()
            .collect();
        entries.sort_by_key(|p| p.date);
        Ok(entries)
    }
}

impl RevenueSource for Snapshot {
    fn get_revenue(&self, lot_id: LotId) -> Result<Option<Decimal>, LedgerError> {
        Ok(self.revenue.get(&lot_id).copied())
    }
}
