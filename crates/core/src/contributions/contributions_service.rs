use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::contributions_model::CurrencyBalance;
use super::contributions_traits::{ContributionRepositoryTrait, ContributionServiceTrait};
use crate::Result;

/// Service exposing the contribution ledger's balance queries.
pub struct ContributionService {
    repository: Arc<dyn ContributionRepositoryTrait>,
}

impl ContributionService {
    pub fn new(repository: Arc<dyn ContributionRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn to_sorted_balances(sums: HashMap<String, Decimal>) -> Vec<CurrencyBalance> {
        let mut balances: Vec<CurrencyBalance> = sums
            .into_iter()
            .map(|(currency, amount)| CurrencyBalance { currency, amount })
            .collect();
        balances.sort_by(|a, b| a.currency.cmp(&b.currency));
        balances
    }
}

impl ContributionServiceTrait for ContributionService {
    fn get_payable_balance(&self, user_id: &str) -> Result<Vec<CurrencyBalance>> {
        let sums = self.repository.sum_daily_by_contributor(user_id)?;
        Ok(Self::to_sorted_balances(sums))
    }

    fn get_repo_balance(&self, repo_id: &str) -> Result<Vec<CurrencyBalance>> {
        let mut sums = self.repository.sum_daily_by_repo(repo_id)?;
        for (currency, amount) in self.repository.sum_future_by_repo(repo_id)? {
            *sums.entry(currency).or_insert(Decimal::ZERO) += amount;
        }
        Ok(Self::to_sorted_balances(sums))
    }
}
