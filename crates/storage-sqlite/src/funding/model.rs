//! Database models for funding events.
//!
//! Amounts are stored as decimal strings so the database never holds a
//! floating-point representation of money.

use std::str::FromStr;

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fairshare_core::funding::{FundingEvent, FundingStatus};
use fairshare_core::Error;

/// Database model for funding events.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::funding_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FundingEventDB {
    pub id: String,
    pub external_id: String,
    pub user_id: String,
    pub amount: String,
    pub currency: String,
    pub status: String,
    pub seats: i64,
    pub freq: i64,
    pub created_at: NaiveDateTime,
}

impl From<FundingEvent> for FundingEventDB {
    fn from(event: FundingEvent) -> Self {
        Self {
            id: event.id,
            external_id: event.external_id,
            user_id: event.user_id,
            amount: event.amount.to_string(),
            currency: event.currency,
            status: event.status.as_str().to_string(),
            seats: event.seats,
            freq: event.freq,
            created_at: event.created_at.naive_utc(),
        }
    }
}

impl TryFrom<FundingEventDB> for FundingEvent {
    type Error = Error;

    fn try_from(db: FundingEventDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            external_id: db.external_id,
            user_id: db.user_id,
            amount: Decimal::from_str(&db.amount)?,
            currency: db.currency,
            status: db.status.parse::<FundingStatus>()?,
            seats: db.seats,
            freq: db.freq,
            created_at: Utc.from_utc_datetime(&db.created_at),
        })
    }
}
