//! Database model for the notification idempotency log.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One claimed (recipient, kind, cycle) key.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct NotificationDB {
    pub id: String,
    pub recipient: String,
    pub kind: String,
    pub cycle: String,
    pub created_at: NaiveDateTime,
}
