//! Database models for daily, future and unclaimed contribution rows.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fairshare_core::contributions::{
    DailyContribution, FutureContribution, UnclaimedContribution,
};
use fairshare_core::Error;

/// Database model for settled daily contributions.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::daily_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DailyContributionDB {
    pub id: String,
    pub sponsor_id: String,
    pub contributor_id: String,
    pub repo_id: String,
    pub amount: String,
    pub currency: String,
    pub day: NaiveDate,
    pub foundation: bool,
    pub created_at: NaiveDateTime,
}

impl From<DailyContribution> for DailyContributionDB {
    fn from(row: DailyContribution) -> Self {
        Self {
            id: row.id,
            sponsor_id: row.sponsor_id,
            contributor_id: row.contributor_id,
            repo_id: row.repo_id,
            amount: row.amount.to_string(),
            currency: row.currency,
            day: row.day,
            foundation: row.foundation,
            created_at: row.created_at.naive_utc(),
        }
    }
}

impl TryFrom<DailyContributionDB> for DailyContribution {
    type Error = Error;

    fn try_from(db: DailyContributionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            sponsor_id: db.sponsor_id,
            contributor_id: db.contributor_id,
            repo_id: db.repo_id,
            amount: Decimal::from_str(&db.amount)?,
            currency: db.currency,
            day: db.day,
            foundation: db.foundation,
            created_at: Utc.from_utc_datetime(&db.created_at),
        })
    }
}

/// Database model for parked future contributions.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::future_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FutureContributionDB {
    pub id: String,
    pub sponsor_id: String,
    pub repo_id: String,
    pub amount: String,
    pub currency: String,
    pub day: NaiveDate,
    pub foundation: bool,
    pub created_at: NaiveDateTime,
}

impl From<FutureContribution> for FutureContributionDB {
    fn from(row: FutureContribution) -> Self {
        Self {
            id: row.id,
            sponsor_id: row.sponsor_id,
            repo_id: row.repo_id,
            amount: row.amount.to_string(),
            currency: row.currency,
            day: row.day,
            foundation: row.foundation,
            created_at: row.created_at.naive_utc(),
        }
    }
}

impl TryFrom<FutureContributionDB> for FutureContribution {
    type Error = Error;

    fn try_from(db: FutureContributionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            sponsor_id: db.sponsor_id,
            repo_id: db.repo_id,
            amount: Decimal::from_str(&db.amount)?,
            currency: db.currency,
            day: db.day,
            foundation: db.foundation,
            created_at: Utc.from_utc_datetime(&db.created_at),
        })
    }
}

/// Database model for unclaimed contribution notionals.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::unclaimed_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct UnclaimedContributionDB {
    pub id: String,
    pub git_email: String,
    pub repo_id: String,
    pub amount: String,
    pub currency: String,
    pub day: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl From<UnclaimedContribution> for UnclaimedContributionDB {
    fn from(row: UnclaimedContribution) -> Self {
        Self {
            id: row.id,
            git_email: row.git_email,
            repo_id: row.repo_id,
            amount: row.amount.to_string(),
            currency: row.currency,
            day: row.day,
            created_at: row.created_at.naive_utc(),
        }
    }
}

impl TryFrom<UnclaimedContributionDB> for UnclaimedContribution {
    type Error = Error;

    fn try_from(db: UnclaimedContributionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            git_email: db.git_email,
            repo_id: db.repo_id,
            amount: Decimal::from_str(&db.amount)?,
            currency: db.currency,
            day: db.day,
            created_at: Utc.from_utc_datetime(&db.created_at),
        })
    }
}
