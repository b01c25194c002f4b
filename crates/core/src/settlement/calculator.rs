use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contributions::ContributionRepositoryTrait;
use crate::errors::ValidationError;
use crate::funding::FundingServiceTrait;
use crate::identity::IdentityServiceTrait;
use crate::Result;

/// A paying user's per-repo spend for one settlement day.
///
/// `per_repo_future_add` is what each repo may hand to contributors. Without
/// parked future money it equals `per_repo_deduct`. With parked money it is
/// the future pool's per-repo slice, `per_repo_future_net` carries its
/// negative for the one-time net-out row, and the distributable amount
/// becomes `per_repo_future_add + per_repo_deduct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub currency: String,
    pub days_remaining: i64,
    pub per_repo_deduct: Decimal,
    pub per_repo_future_add: Decimal,
    pub per_repo_future_net: Option<Decimal>,
}

/// Computes each paying user's daily share from the funding ledger and the
/// already-committed contribution sums.
pub struct SettlementCalculator {
    funding_service: Arc<dyn FundingServiceTrait>,
    identity_service: Arc<dyn IdentityServiceTrait>,
    contribution_repository: Arc<dyn ContributionRepositoryTrait>,
}

impl SettlementCalculator {
    pub fn new(
        funding_service: Arc<dyn FundingServiceTrait>,
        identity_service: Arc<dyn IdentityServiceTrait>,
        contribution_repository: Arc<dyn ContributionRepositoryTrait>,
    ) -> Self {
        Self {
            funding_service,
            identity_service,
            contribution_repository,
        }
    }

    /// Sums committed spend across every sponsor identity drawing from this
    /// user's pool. Rows keep the original sponsor id, so the paying user's
    /// own rows alone would understate what already left the pool.
    fn committed_sums(&self, paying_user_id: &str) -> Result<(
        HashMap<String, Decimal>,
        HashMap<String, Decimal>,
    )> {
        let members = self.identity_service.funding_pool_members(paying_user_id)?;
        let mut daily = HashMap::new();
        let mut future = HashMap::new();
        for member in &members {
            for (currency, amount) in self.contribution_repository.sum_daily_by_sponsor(member)? {
                *daily.entry(currency).or_insert(Decimal::ZERO) += amount;
            }
            for (currency, amount) in self.contribution_repository.sum_future_by_sponsor(member)? {
                *future.entry(currency).or_insert(Decimal::ZERO) += amount;
            }
        }
        Ok((daily, future))
    }

    /// Picks a currency and splits the paying user's daily rate across
    /// `repo_count` repos. Returns `None` when no currency covers a day.
    pub fn compute_share(&self, paying_user_id: &str, repo_count: i64) -> Result<Option<Share>> {
        if repo_count <= 0 {
            return Err(ValidationError::InvalidInput(format!(
                "repo count must be positive, got {}",
                repo_count
            ))
            .into());
        }

        let (committed_daily, committed_future) = self.committed_sums(paying_user_id)?;
        let strategy = match self.funding_service.select_spend_strategy(
            paying_user_id,
            &committed_daily,
            &committed_future,
        )? {
            Some(strategy) => strategy,
            None => return Ok(None),
        };

        let repos = Decimal::from(repo_count);
        let per_repo_deduct = (strategy.per_day / repos).trunc();

        let future_pool = committed_future
            .get(&strategy.currency)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let (per_repo_future_add, per_repo_future_net) = if future_pool.is_zero() {
            (per_repo_deduct, None)
        } else {
            let add = (future_pool / repos).trunc();
            (add, Some(-add))
        };

        debug!(
            "share for {}: {} x {} over {} repos, {} days left, future add {:?}",
            paying_user_id,
            per_repo_deduct,
            strategy.currency,
            repo_count,
            strategy.days_remaining,
            per_repo_future_net.map(|n| -n)
        );

        Ok(Some(Share {
            currency: strategy.currency,
            days_remaining: strategy.days_remaining,
            per_repo_deduct,
            per_repo_future_add,
            per_repo_future_net,
        }))
    }
}
