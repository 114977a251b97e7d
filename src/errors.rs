use thiserror::Error;

/// Error type that captures common ledger and calculation failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Identity conflict: {0}")]
    Conflict(String),
    #[error("Not calculated: {0}")]
    NotCalculated(String),
    #[error("Calculation failed: {0}")]
    Calculation(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
