//! Database models for users and git-identity links.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fairshare_core::identity::{GitIdentity, User};

/// Database model for users.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct UserDB {
    pub id: String,
    pub invited_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            invited_by: db.invited_by,
            created_at: Utc.from_utc_datetime(&db.created_at),
        }
    }
}

/// Database model for git-identity links.
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
#[diesel(belongs_to(UserDB, foreign_key = user_id))]
#[diesel(table_name = crate::schema::git_identities)]
#[diesel(primary_key(git_email))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GitIdentityDB {
    pub git_email: String,
    pub user_id: String,
    pub created_at: NaiveDateTime,
}

impl From<GitIdentityDB> for GitIdentity {
    fn from(db: GitIdentityDB) -> Self {
        Self {
            git_email: db.git_email,
            user_id: db.user_id,
            created_at: Utc.from_utc_datetime(&db.created_at),
        }
    }
}
