//! Database models for relationship events.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fairshare_core::relationships::{RelationshipEvent, RelationshipKind};
use fairshare_core::Error;

/// Database model for relationship events. One row per open, closed in
/// place by setting `inactive_at`.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::relationship_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEventDB {
    pub id: String,
    pub actor_id: String,
    pub repo_id: String,
    pub kind: String,
    pub active_at: NaiveDateTime,
    pub inactive_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl RelationshipEventDB {
    pub fn from_domain(event: &RelationshipEvent, created_at: NaiveDateTime) -> Self {
        Self {
            id: event.id.clone(),
            actor_id: event.actor_id.clone(),
            repo_id: event.repo_id.clone(),
            kind: event.kind.as_str().to_string(),
            active_at: event.active_at.naive_utc(),
            inactive_at: event.inactive_at.map(|at| at.naive_utc()),
            created_at,
        }
    }
}

impl TryFrom<RelationshipEventDB> for RelationshipEvent {
    type Error = Error;

    fn try_from(db: RelationshipEventDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            actor_id: db.actor_id,
            repo_id: db.repo_id,
            kind: db.kind.parse::<RelationshipKind>()?,
            active_at: Utc.from_utc_datetime(&db.active_at),
            inactive_at: db.inactive_at.map(|at| Utc.from_utc_datetime(&at)),
        })
    }
}
