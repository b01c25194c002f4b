//! Contribution ledger domain models.
//!
//! Rows are created only by the distribution engine during a settlement run
//! and are never updated afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settled money for one (day, sponsor, repo, contributor, currency) key.
/// The key is unique; reprocessing a day fails on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyContribution {
    pub id: String,
    pub sponsor_id: String,
    pub contributor_id: String,
    pub repo_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub day: NaiveDate,
    pub foundation: bool,
    pub created_at: DateTime<Utc>,
}

/// Money parked for a repo with nobody to pay, or a (negative) net-out of
/// previously parked money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureContribution {
    pub id: String,
    pub sponsor_id: String,
    pub repo_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub day: NaiveDate,
    pub foundation: bool,
    pub created_at: DateTime<Utc>,
}

/// What an unlinked git identity would have earned. Informational only;
/// never moves money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnclaimedContribution {
    pub id: String,
    pub git_email: String,
    pub repo_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A per-currency balance line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBalance {
    pub currency: String,
    pub amount: Decimal,
}

/// The complete row set of one sponsor's settlement run. Committed as one
/// transaction: all rows land or none do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRun {
    pub daily: Vec<DailyContribution>,
    pub future: Vec<FutureContribution>,
    pub unclaimed: Vec<UnclaimedContribution>,
}

impl SettlementRun {
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.future.is_empty() && self.unclaimed.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.daily.len() + self.future.len() + self.unclaimed.len()
    }
}
