//! Funding ledger domain models.
//!
//! Amounts are exact decimal integers in the currency's minor units; nothing
//! in this module ever touches floating point.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};

/// Lifecycle states of a pay-in. A Request is never mutated; later states
/// are appended as separate rows keyed by the same external id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundingStatus {
    Request,
    Success,
    Fee,
    Partially,
    Expired,
    Failed,
    Refunded,
    Action,
    Method,
}

impl FundingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundingStatus::Request => "REQUEST",
            FundingStatus::Success => "SUCCESS",
            FundingStatus::Fee => "FEE",
            FundingStatus::Partially => "PARTIALLY",
            FundingStatus::Expired => "EXPIRED",
            FundingStatus::Failed => "FAILED",
            FundingStatus::Refunded => "REFUNDED",
            FundingStatus::Action => "ACTION",
            FundingStatus::Method => "METHOD",
        }
    }

    /// States delivered by the payment gateway as plain transitions, without
    /// the Success/Fee split.
    pub fn is_gateway_transition(&self) -> bool {
        matches!(
            self,
            FundingStatus::Partially
                | FundingStatus::Expired
                | FundingStatus::Failed
                | FundingStatus::Refunded
                | FundingStatus::Action
                | FundingStatus::Method
        )
    }
}

impl std::str::FromStr for FundingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REQUEST" => Ok(FundingStatus::Request),
            "SUCCESS" => Ok(FundingStatus::Success),
            "FEE" => Ok(FundingStatus::Fee),
            "PARTIALLY" => Ok(FundingStatus::Partially),
            "EXPIRED" => Ok(FundingStatus::Expired),
            "FAILED" => Ok(FundingStatus::Failed),
            "REFUNDED" => Ok(FundingStatus::Refunded),
            "ACTION" => Ok(FundingStatus::Action),
            "METHOD" => Ok(FundingStatus::Method),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown funding status: {}",
                other
            ))
            .into()),
        }
    }
}

impl std::fmt::Display for FundingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only pay-in ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingEvent {
    pub id: String,
    pub external_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: FundingStatus,
    pub seats: i64,
    pub freq: i64,
    pub created_at: DateTime<Utc>,
}

/// Input model for recording a new payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFundingEvent {
    pub external_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub seats: i64,
    pub freq: i64,
}

/// The outcome of the spend strategy: the currency to draw from today, its
/// per-day rate and how many whole days it still covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendStrategy {
    pub currency: String,
    pub per_day: Decimal,
    pub days_remaining: i64,
}
