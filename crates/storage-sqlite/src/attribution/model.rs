//! Database models for attribution requests and entries.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fairshare_core::attribution::{AttributionEntry, AttributionRequest};
use fairshare_core::Error;

/// Database model for attribution requests.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::attribution_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AttributionRequestDB {
    pub id: String,
    pub repo_id: String,
    pub git_url: String,
    pub date_from: NaiveDateTime,
    pub date_to: NaiveDateTime,
    pub received_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl AttributionRequestDB {
    pub fn from_domain(request: &AttributionRequest, created_at: NaiveDateTime) -> Self {
        Self {
            id: request.id.clone(),
            repo_id: request.repo_id.clone(),
            git_url: request.git_url.clone(),
            date_from: request.date_from.naive_utc(),
            date_to: request.date_to.naive_utc(),
            received_at: request.received_at.map(|at| at.naive_utc()),
            created_at,
        }
    }
}

impl From<AttributionRequestDB> for AttributionRequest {
    fn from(db: AttributionRequestDB) -> Self {
        Self {
            id: db.id,
            repo_id: db.repo_id,
            git_url: db.git_url,
            date_from: Utc.from_utc_datetime(&db.date_from),
            date_to: Utc.from_utc_datetime(&db.date_to),
            received_at: db.received_at.map(|at| Utc.from_utc_datetime(&at)),
        }
    }
}

/// Database model for attribution entries. `git_names` is a JSON array.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(AttributionRequestDB, foreign_key = request_id))]
#[diesel(table_name = crate::schema::attribution_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AttributionEntryDB {
    pub id: String,
    pub request_id: String,
    pub git_email: String,
    pub git_names: String,
    pub weight: f64,
    pub created_at: NaiveDateTime,
}

impl AttributionEntryDB {
    pub fn from_domain(entry: &AttributionEntry, created_at: NaiveDateTime) -> Result<Self, Error> {
        Ok(Self {
            id: entry.id.clone(),
            request_id: entry.request_id.clone(),
            git_email: entry.git_email.clone(),
            git_names: serde_json::to_string(&entry.git_names)?,
            weight: entry.weight,
            created_at,
        })
    }
}

impl TryFrom<AttributionEntryDB> for AttributionEntry {
    type Error = Error;

    fn try_from(db: AttributionEntryDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            request_id: db.request_id,
            git_email: db.git_email,
            git_names: serde_json::from_str(&db.git_names)?,
            weight: db.weight,
        })
    }
}
