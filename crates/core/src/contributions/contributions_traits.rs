use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::contributions_model::{CurrencyBalance, SettlementRun};
use crate::Result;

/// Trait defining the contract for contribution ledger storage.
#[async_trait]
pub trait ContributionRepositoryTrait: Send + Sync {
    /// Commits a settlement run atomically. A duplicate daily key must
    /// surface as `DatabaseError::UniqueViolation` and roll back the whole
    /// run.
    async fn commit_run(&self, run: SettlementRun) -> Result<()>;

    /// Per-currency sum of daily contributions a sponsor has paid out.
    fn sum_daily_by_sponsor(&self, sponsor_id: &str) -> Result<HashMap<String, Decimal>>;

    /// Per-currency sum of a sponsor's parked future contributions,
    /// including negative net-out rows.
    fn sum_future_by_sponsor(&self, sponsor_id: &str) -> Result<HashMap<String, Decimal>>;

    /// Per-currency sum of daily contributions a contributor has earned.
    fn sum_daily_by_contributor(&self, contributor_id: &str) -> Result<HashMap<String, Decimal>>;

    fn sum_daily_by_repo(&self, repo_id: &str) -> Result<HashMap<String, Decimal>>;

    fn sum_future_by_repo(&self, repo_id: &str) -> Result<HashMap<String, Decimal>>;
}

/// Trait defining the contract for contribution ledger queries.
pub trait ContributionServiceTrait: Send + Sync {
    /// Per-currency earnings of a contributor, ordered by currency code.
    fn get_payable_balance(&self, user_id: &str) -> Result<Vec<CurrencyBalance>>;

    /// Per-currency money a repo has attracted (daily plus parked future),
    /// ordered by currency code.
    fn get_repo_balance(&self, repo_id: &str) -> Result<Vec<CurrencyBalance>>;
}
