use thiserror::Error;

/// Errors raised by the relationship ledger.
#[derive(Debug, Error)]
pub enum RelationshipError {
    /// The requested transition violates the temporal or openness invariants
    /// of the (actor, repo, kind) key. Never auto-retried.
    #[error("Relationship state conflict: {0}")]
    StateConflict(String),

    /// Caller usage error: the change does not carry exactly one of
    /// {active_at, inactive_at}.
    #[error("Invalid relationship transition: {0}")]
    InvalidTransition(String),
}

impl From<RelationshipError> for String {
    fn from(error: RelationshipError) -> Self {
        error.to_string()
    }
}
