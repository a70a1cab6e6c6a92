use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlerterError {
    #[error("Alert thresholds from configuration are invalid: {0}")]
    InvalidThresholds(String),
}
