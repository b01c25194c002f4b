use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::relationships_model::{
    RelationshipChange, RelationshipEvent, RelationshipKind, SponsorSet,
};
use crate::Result;

/// Trait defining the contract for relationship ledger storage.
#[async_trait]
pub trait RelationshipRepositoryTrait: Send + Sync {
    /// The most recent event for a key, open or closed.
    fn last_event(
        &self,
        actor_id: &str,
        repo_id: &str,
        kind: RelationshipKind,
    ) -> Result<Option<RelationshipEvent>>;

    /// The currently open event for a key, if any.
    fn open_event(
        &self,
        actor_id: &str,
        repo_id: &str,
        kind: RelationshipKind,
    ) -> Result<Option<RelationshipEvent>>;

    /// Appends an open event. The implementation must enforce "at most one
    /// open event per key" atomically (partial unique index or equivalent)
    /// and surface a violation as `DatabaseError::UniqueViolation`.
    async fn insert_open(&self, event: RelationshipEvent) -> Result<RelationshipEvent>;

    /// Closes the open event for a key in a single conditional write.
    /// Fails with `RelationshipError::StateConflict` when no open event
    /// exists at write time.
    async fn close_open(
        &self,
        actor_id: &str,
        repo_id: &str,
        kind: RelationshipKind,
        inactive_at: DateTime<Utc>,
    ) -> Result<RelationshipEvent>;

    /// Repo ids with an open event of the given kind for an actor.
    fn open_repos(&self, actor_id: &str, kind: RelationshipKind) -> Result<Vec<String>>;

    /// All (sponsor, repo_ids) pairs whose Sponsor relationship overlaps the
    /// closed interval: `active_at < start AND (inactive_at IS NULL OR
    /// inactive_at >= stop)`. Grouped per sponsor, ordered by sponsor id.
    fn sponsors_between(
        &self,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> Result<Vec<SponsorSet>>;
}

/// Trait defining the contract for relationship ledger operations.
#[async_trait]
pub trait RelationshipServiceTrait: Send + Sync {
    async fn open_relationship(&self, change: RelationshipChange) -> Result<RelationshipEvent>;
    async fn close_relationship(&self, change: RelationshipChange) -> Result<RelationshipEvent>;
    fn open_repos(&self, actor_id: &str, kind: RelationshipKind) -> Result<Vec<String>>;
    fn sponsors_between(
        &self,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> Result<Vec<SponsorSet>>;
}
