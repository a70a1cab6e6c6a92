use core_types::LotId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Lot {0} was not found in the registry.")]
    NotFound(LotId),

    #[error("The ledger is unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read the ledger snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    Json(#[from] serde_json::Error),
}
