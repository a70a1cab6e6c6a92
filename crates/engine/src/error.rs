use alerter::error::AlerterError;
use analytics::AnalyticsError;
use core_types::{CoreError, LotId};
use ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Lot {0} was not found.")]
    NotFound(LotId),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A collaborator is unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Engine configuration is invalid: {0}")]
    Configuration(String),
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(lot_id) => EngineError::NotFound(lot_id),
            other => EngineError::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<AnalyticsError> for EngineError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidState(msg) => EngineError::InvalidState(msg),
            AnalyticsError::Calculation(msg) => EngineError::InvalidState(msg),
        }
    }
}

impl From<AlerterError> for EngineError {
    fn from(err: AlerterError) -> Self {
        EngineError::Configuration(err.to_string())
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        EngineError::InvalidInput(err.to_string())
    }
}
