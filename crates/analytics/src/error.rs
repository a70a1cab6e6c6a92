use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("The lot is in an invalid state for this calculation: {0}")]
    InvalidState(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
