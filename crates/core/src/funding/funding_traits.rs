use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::funding_model::{FundingEvent, FundingStatus, NewFundingEvent, SpendStrategy};
use crate::Result;

/// Trait defining the contract for funding ledger storage.
#[async_trait]
pub trait FundingRepositoryTrait: Send + Sync {
    /// Appends one ledger row. `(external_id, status)` is unique; a
    /// duplicate surfaces as `DatabaseError::UniqueViolation`.
    async fn insert_event(&self, event: FundingEvent) -> Result<FundingEvent>;

    /// Appends the Success and Fee rows of a confirmation in one
    /// transaction.
    async fn insert_settled_pair(&self, success: FundingEvent, fee: FundingEvent) -> Result<()>;

    fn find_by_external_id(
        &self,
        external_id: &str,
        status: FundingStatus,
    ) -> Result<Option<FundingEvent>>;

    fn events_for_user(&self, user_id: &str) -> Result<Vec<FundingEvent>>;

    /// Per-currency sum of rows with the given status for a user.
    fn sum_by_currency(
        &self,
        user_id: &str,
        status: FundingStatus,
    ) -> Result<HashMap<String, Decimal>>;

    /// The most recent Success row for a user and currency; its
    /// amount/seats/freq define the currency's per-day rate.
    fn latest_success(&self, user_id: &str, currency: &str) -> Result<Option<FundingEvent>>;
}

/// Trait defining the contract for funding ledger operations.
#[async_trait]
pub trait FundingServiceTrait: Send + Sync {
    /// Records a payment intent as a Request row.
    async fn record_funding(
        &self,
        new_event: NewFundingEvent,
        now: DateTime<Utc>,
    ) -> Result<FundingEvent>;

    /// Confirms a pay-in: appends a Success row (amount minus fee) and a Fee
    /// row. Idempotent per external id; a second confirmation is a no-op.
    async fn confirm_funding(
        &self,
        external_id: &str,
        fee: Decimal,
        now: DateTime<Utc>,
    ) -> Result<()>;

    /// Records a Partially/Expired/Failed/Refunded/Action/Method transition
    /// delivered by the gateway. Idempotent per (external id, status).
    async fn record_gateway_transition(
        &self,
        external_id: &str,
        status: FundingStatus,
        now: DateTime<Utc>,
    ) -> Result<()>;

    /// Picks the currency with the most whole days of funding left, given
    /// the user's already-committed daily and future spend per currency.
    /// Returns `None` when no currency covers at least one day.
    fn select_spend_strategy(
        &self,
        user_id: &str,
        committed_daily: &HashMap<String, Decimal>,
        committed_future: &HashMap<String, Decimal>,
    ) -> Result<Option<SpendStrategy>>;

    fn events_for_user(&self, user_id: &str) -> Result<Vec<FundingEvent>>;
}
