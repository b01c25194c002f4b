//! Relationship ledger domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};

/// The association kinds backed by the same two-state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    Sponsor,
    Trust,
    Multiplier,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Sponsor => "SPONSOR",
            RelationshipKind::Trust => "TRUST",
            RelationshipKind::Multiplier => "MULTIPLIER",
        }
    }
}

impl std::str::FromStr for RelationshipKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPONSOR" => Ok(RelationshipKind::Sponsor),
            "TRUST" => Ok(RelationshipKind::Trust),
            "MULTIPLIER" => Ok(RelationshipKind::Multiplier),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown relationship kind: {}",
                other
            ))
            .into()),
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger row: opened at `active_at`, closed when `inactive_at` is set.
///
/// At most one row per (actor, repo, kind) may have `inactive_at = NULL`;
/// the storage layer enforces this atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEvent {
    pub id: String,
    pub actor_id: String,
    pub repo_id: String,
    pub kind: RelationshipKind,
    pub active_at: DateTime<Utc>,
    pub inactive_at: Option<DateTime<Utc>>,
}

impl RelationshipEvent {
    pub fn is_open(&self) -> bool {
        self.inactive_at.is_none()
    }

    /// The latest instant this key has seen, used for monotonicity checks.
    pub fn last_instant(&self) -> DateTime<Utc> {
        self.inactive_at.unwrap_or(self.active_at)
    }
}

/// A requested open or close. Exactly one of {active_at, inactive_at} must
/// be set; the service rejects anything else as an invalid transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipChange {
    pub actor_id: String,
    pub repo_id: String,
    pub kind: RelationshipKind,
    pub active_at: Option<DateTime<Utc>>,
    pub inactive_at: Option<DateTime<Utc>>,
}

/// A sponsor together with the repos their open Sponsor relationship covers
/// in a settlement window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorSet {
    pub sponsor_id: String,
    pub repo_ids: Vec<String>,
}
