use chrono::NaiveDate;
use core_types::{ExpenseEntry, Lot, ProductionEntry};

/// Everything the calculations know about one lot, frozen at `as_of`.
///
/// Entries dated after `as_of` are dropped on construction and the rest are kept in
/// ascending date order. The Initial/Productive boundary is derived once here so every
/// calculation over the same history attributes expenses identically.
#[derive(Debug, Clone, PartialEq)]
pub struct LotHistory {
    lot: Lot,
    expenses: Vec<ExpenseEntry>,
    production: Vec<ProductionEntry>,
    as_of: NaiveDate,
    boundary: Option<NaiveDate>,
}

impl LotHistory {
    pub fn new(
        lot: Lot,
        mut expenses: Vec<ExpenseEntry>,
        mut production: Vec<ProductionEntry>,
        as_of: NaiveDate,
    ) -> Self {
        expenses.retain(|e| e.lot_id == lot.id && e.date <= as_of);
        production.retain(|p| p.lot_id == lot.id && p.date <= as_of);
        expenses.sort_by_key(|e| e.date);
        production.sort_by_key(|p| p.date);
        let boundary = phase_boundary(&production);

        Self {
            lot,
            expenses,
            production,
            as_of,
            boundary,
        }
    }

    pub fn lot(&self) -> &Lot {
        &self.lot
    }

    pub fn expenses(&self) -> &[ExpenseEntry] {
        &self.expenses
    }

    pub fn production(&self) -> &[ProductionEntry] {
        &self.production
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// First day with eggs collected, i.e. the start of the Productive phase.
    pub fn phase_boundary(&self) -> Option<NaiveDate> {
        self.boundary
    }

    /// Whether an expense on `date` belongs to the Productive phase.
    pub fn is_productive_date(&self, date: NaiveDate) -> bool {
        self.boundary.is_some_and(|b| date >= b)
    }
}

/// The date of the earliest production entry with at least one unit.
pub fn phase_boundary(production: &[ProductionEntry]) -> Option<NaiveDate> {
    production
        .iter()
        .filter(|p| p.units > 0)
        .map(|p| p.date)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::LotStatus;
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    #[test]
    fn boundary_ignores_zero_unit_entries() {
        let lot_id = Uuid::new_v4();
        let production = vec![
            ProductionEntry::new(lot_id, date(12), 40),
            ProductionEntry::new(lot_id, date(3), 0),
            ProductionEntry::new(lot_id, date(8), 5),
        ];
        assert_eq!(phase_boundary(&production), Some(date(8)));
        assert_eq!(phase_boundary(&production[1..2]), None);
    }

    #[test]
    fn history_drops_entries_after_as_of() {
        let lot = Lot {
            id: Uuid::new_v4(),
            name: "Galpon".to_string(),
            breed: "Hy-Line Brown".to_string(),
            initial_bird_count: 10,
            current_bird_count: 10,
            start_date: date(1),
            birth_date: date(1),
            status: LotStatus::Active,
        };
        let production = vec![
            ProductionEntry::new(lot.id, date(20), 9),
            ProductionEntry::new(lot.id, date(10), 0),
        ];
        let history = LotHistory::new(lot, Vec::new(), production, date(15));
        assert_eq!(history.production().len(), 1);
        assert_eq!(history.phase_boundary(), None);
        assert!(!history.is_productive_date(date(15)));
    }
}
