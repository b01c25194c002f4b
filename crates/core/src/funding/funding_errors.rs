use thiserror::Error;

/// Errors raised by the funding ledger.
#[derive(Debug, Error)]
pub enum FundingError {
    /// No outstanding Request row for the referenced external id.
    #[error("Funding event not found: {0}")]
    NotFound(String),

    /// The requested status is not valid for this operation.
    #[error("Invalid funding status: {0}")]
    InvalidStatus(String),
}

impl From<FundingError> for String {
    fn from(error: FundingError) -> Self {
        error.to_string()
    }
}
