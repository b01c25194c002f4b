use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use fairshare_core::relationships::{
    RelationshipError, RelationshipEvent, RelationshipKind, RelationshipRepositoryTrait,
    SponsorSet,
};
use fairshare_core::Result;

use super::model::RelationshipEventDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::relationship_events::dsl::*;

pub struct RelationshipRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RelationshipRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl RelationshipRepositoryTrait for RelationshipRepository {
    fn last_event(
        &self,
        actor: &str,
        repo: &str,
        relationship_kind: RelationshipKind,
    ) -> Result<Option<RelationshipEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let row = relationship_events
            .filter(actor_id.eq(actor))
            .filter(repo_id.eq(repo))
            .filter(kind.eq(relationship_kind.as_str()))
            .order(active_at.desc())
            .first::<RelationshipEventDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(RelationshipEvent::try_from).transpose()
    }

    fn open_event(
        &self,
        actor: &str,
        repo: &str,
        relationship_kind: RelationshipKind,
    ) -> Result<Option<RelationshipEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let row = relationship_events
            .filter(actor_id.eq(actor))
            .filter(repo_id.eq(repo))
            .filter(kind.eq(relationship_kind.as_str()))
            .filter(inactive_at.is_null())
            .first::<RelationshipEventDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(RelationshipEvent::try_from).transpose()
    }

    async fn insert_open(&self, event: RelationshipEvent) -> Result<RelationshipEvent> {
        self.writer
            .exec(move |conn| -> Result<RelationshipEvent> {
                let row = RelationshipEventDB::from_domain(&event, event.active_at.naive_utc());
                // the partial unique index turns a concurrent double-open
                // into a UniqueViolation here
                diesel::insert_into(relationship_events)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(event)
            })
            .await
    }

    async fn close_open(
        &self,
        actor: &str,
        repo: &str,
        relationship_kind: RelationshipKind,
        closed_at: DateTime<Utc>,
    ) -> Result<RelationshipEvent> {
        let actor = actor.to_string();
        let repo = repo.to_string();
        self.writer
            .exec(move |conn| -> Result<RelationshipEvent> {
                let updated = diesel::update(
                    relationship_events
                        .filter(actor_id.eq(&actor))
                        .filter(repo_id.eq(&repo))
                        .filter(kind.eq(relationship_kind.as_str()))
                        .filter(inactive_at.is_null()),
                )
                .set(inactive_at.eq(closed_at.naive_utc()))
                .execute(conn)
                .map_err(StorageError::from)?;

                if updated == 0 {
                    return Err(RelationshipError::StateConflict(format!(
                        "no open {} relationship for actor {} and repo {}",
                        relationship_kind, actor, repo
                    ))
                    .into());
                }

                let row = relationship_events
                    .filter(actor_id.eq(&actor))
                    .filter(repo_id.eq(&repo))
                    .filter(kind.eq(relationship_kind.as_str()))
                    .filter(inactive_at.eq(closed_at.naive_utc()))
                    .order(active_at.desc())
                    .first::<RelationshipEventDB>(conn)
                    .map_err(StorageError::from)?;
                RelationshipEvent::try_from(row)
            })
            .await
    }

    fn open_repos(&self, actor: &str, relationship_kind: RelationshipKind) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        relationship_events
            .filter(actor_id.eq(actor))
            .filter(kind.eq(relationship_kind.as_str()))
            .filter(inactive_at.is_null())
            .select(repo_id)
            .load::<String>(&mut conn)
            .map_err(|e| StorageError::from(e).into())
    }

    fn sponsors_between(
        &self,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> Result<Vec<SponsorSet>> {
        let mut conn = get_connection(&self.pool)?;
        let pairs = relationship_events
            .filter(kind.eq(RelationshipKind::Sponsor.as_str()))
            .filter(active_at.lt(start.naive_utc()))
            .filter(inactive_at.is_null().or(inactive_at.ge(stop.naive_utc())))
            .select((actor_id, repo_id))
            .distinct()
            .order(actor_id.asc())
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;

        let mut sets: Vec<SponsorSet> = Vec::new();
        for (sponsor, repo) in pairs {
            match sets.last_mut() {
                Some(set) if set.sponsor_id == sponsor => set.repo_ids.push(repo),
                _ => sets.push(SponsorSet {
                    sponsor_id: sponsor,
                    repo_ids: vec![repo],
                }),
            }
        }
        Ok(sets)
    }
}
