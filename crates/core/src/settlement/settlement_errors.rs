use thiserror::Error;

/// Errors raised by the settlement pipeline.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The planned row set does not add up to the computed share within the
    /// allowed truncation residue. Fatal: the run is aborted before any row
    /// is written.
    #[error("Conservation violation: {0}")]
    ConservationViolation(String),
}

impl From<SettlementError> for String {
    fn from(error: SettlementError) -> Self {
        error.to_string()
    }
}
