use serde::{Deserialize, Serialize};

/// Lifecycle state of a lot as recorded by the lot registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    Active,
    Finalized,
}

impl LotStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, LotStatus::Active)
    }
}

/// The kind of spending an expense entry represents.
///
/// The declaration order is the order used when expense breakdowns are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Feed,
    Medication,
    Vaccination,
    Labor,
    Utilities,
    Equipment,
    Birds,
    Other,
}

impl ExpenseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Feed => "feed",
            ExpenseCategory::Medication => "medication",
            ExpenseCategory::Vaccination => "vaccination",
            ExpenseCategory::Labor => "labor",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Equipment => "equipment",
            ExpenseCategory::Birds => "birds",
            ExpenseCategory::Other => "other",
        }
    }
}
