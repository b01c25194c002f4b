use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use super::relationships_errors::RelationshipError;
use super::relationships_model::{
    RelationshipChange, RelationshipEvent, RelationshipKind, SponsorSet,
};
use super::relationships_traits::{RelationshipRepositoryTrait, RelationshipServiceTrait};
use crate::Result;

/// Service for opening and closing Sponsor/Trust/Multiplier relationships.
///
/// The service pre-validates the transition against the key's last event so
/// callers get precise errors, but the authoritative guard is the atomic
/// check in storage: the partial unique index for opens and the conditional
/// update for closes.
pub struct RelationshipService {
    repository: Arc<dyn RelationshipRepositoryTrait>,
}

impl RelationshipService {
    pub fn new(repository: Arc<dyn RelationshipRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn validate_open(change: &RelationshipChange) -> Result<DateTime<Utc>> {
        match (change.active_at, change.inactive_at) {
            (Some(at), None) => Ok(at),
            _ => Err(RelationshipError::InvalidTransition(format!(
                "opening requires active_at and no inactive_at, got active_at: {:?}, inactive_at: {:?}",
                change.active_at, change.inactive_at
            ))
            .into()),
        }
    }

    fn validate_close(change: &RelationshipChange) -> Result<DateTime<Utc>> {
        match (change.active_at, change.inactive_at) {
            (None, Some(at)) => Ok(at),
            _ => Err(RelationshipError::InvalidTransition(format!(
                "closing requires inactive_at and no active_at, got active_at: {:?}, inactive_at: {:?}",
                change.active_at, change.inactive_at
            ))
            .into()),
        }
    }
}

#[async_trait]
impl RelationshipServiceTrait for RelationshipService {
    async fn open_relationship(&self, change: RelationshipChange) -> Result<RelationshipEvent> {
        let active_at = Self::validate_open(&change)?;

        if let Some(last) =
            self.repository
                .last_event(&change.actor_id, &change.repo_id, change.kind)?
        {
            if last.is_open() {
                return Err(RelationshipError::StateConflict(format!(
                    "{} relationship for actor {} and repo {} is already open since {}",
                    change.kind, change.actor_id, change.repo_id, last.active_at
                ))
                .into());
            }
            if active_at < last.last_instant() {
                return Err(RelationshipError::StateConflict(format!(
                    "cannot open {} relationship at {}, the key was last touched at {}",
                    change.kind,
                    active_at,
                    last.last_instant()
                ))
                .into());
            }
        }

        let event = RelationshipEvent {
            id: Uuid::new_v4().to_string(),
            actor_id: change.actor_id,
            repo_id: change.repo_id,
            kind: change.kind,
            active_at,
            inactive_at: None,
        };
        debug!(
            "opening {} relationship: actor {} repo {} at {}",
            event.kind, event.actor_id, event.repo_id, active_at
        );
        self.repository.insert_open(event).await
    }

    async fn close_relationship(&self, change: RelationshipChange) -> Result<RelationshipEvent> {
        let inactive_at = Self::validate_close(&change)?;

        let open = self
            .repository
            .open_event(&change.actor_id, &change.repo_id, change.kind)?
            .ok_or_else(|| {
                RelationshipError::StateConflict(format!(
                    "no open {} relationship for actor {} and repo {}",
                    change.kind, change.actor_id, change.repo_id
                ))
            })?;

        if inactive_at < open.active_at {
            return Err(RelationshipError::StateConflict(format!(
                "cannot close {} relationship at {}, it was opened later at {}",
                change.kind, inactive_at, open.active_at
            ))
            .into());
        }

        debug!(
            "closing {} relationship: actor {} repo {} at {}",
            change.kind, change.actor_id, change.repo_id, inactive_at
        );
        self.repository
            .close_open(&change.actor_id, &change.repo_id, change.kind, inactive_at)
            .await
    }

    fn open_repos(&self, actor_id: &str, kind: RelationshipKind) -> Result<Vec<String>> {
        self.repository.open_repos(actor_id, kind)
    }

    fn sponsors_between(
        &self,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> Result<Vec<SponsorSet>> {
        self.repository.sponsors_between(start, stop)
    }
}
