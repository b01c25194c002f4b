use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, info};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::calculator::Share;
use super::settlement_errors::SettlementError;
use crate::attribution::AttributionServiceTrait;
use crate::contributions::{
    ContributionRepositoryTrait, DailyContribution, FutureContribution, SettlementRun,
    UnclaimedContribution,
};
use crate::identity::IdentityServiceTrait;
use crate::Result;

/// Converts a weight ratio into an integer amount of the pool, truncating
/// toward zero. This is the only place weights touch money.
fn weighted_share(pool: Decimal, weight: f64, total: f64) -> Decimal {
    let weight = Decimal::from_f64_retain(weight).unwrap_or_default();
    let total = Decimal::from_f64_retain(total).unwrap_or_default();
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (pool * weight / total).trunc()
}

/// Splits a sponsor's computed share across the contributors of their repos
/// and commits the whole run as one transaction.
pub struct DistributionEngine {
    attribution_service: Arc<dyn AttributionServiceTrait>,
    identity_service: Arc<dyn IdentityServiceTrait>,
    contribution_repository: Arc<dyn ContributionRepositoryTrait>,
}

impl DistributionEngine {
    pub fn new(
        attribution_service: Arc<dyn AttributionServiceTrait>,
        identity_service: Arc<dyn IdentityServiceTrait>,
        contribution_repository: Arc<dyn ContributionRepositoryTrait>,
    ) -> Self {
        Self {
            attribution_service,
            identity_service,
            contribution_repository,
        }
    }

    /// Plans and commits one sponsor's settlement for one day.
    ///
    /// The full row set is built in memory and checked before anything is
    /// written; a failure inside `commit_run` (including the uniqueness
    /// rejection of an already-settled day) leaves the ledger untouched.
    pub async fn distribute(
        &self,
        sponsor_id: &str,
        repo_ids: &[String],
        day: NaiveDate,
        share: &Share,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut run = SettlementRun::default();
        for repo_id in repo_ids {
            self.plan_repo(sponsor_id, repo_id, day, share, now, &mut run)?;
        }

        info!(
            "settling sponsor {} for {}: {} daily, {} future, {} unclaimed rows",
            sponsor_id,
            day,
            run.daily.len(),
            run.future.len(),
            run.unclaimed.len()
        );
        self.contribution_repository.commit_run(run).await
    }

    fn plan_repo(
        &self,
        sponsor_id: &str,
        repo_id: &str,
        day: NaiveDate,
        share: &Share,
        now: DateTime<Utc>,
        run: &mut SettlementRun,
    ) -> Result<()> {
        let entries = self.attribution_service.latest_entries(repo_id)?;
        if entries.is_empty() {
            debug!("no attribution for repo {}, parking deduction", repo_id);
            run.future
                .push(self.future_row(sponsor_id, repo_id, share.per_repo_deduct, share, day, now));
            return Ok(());
        }

        // BTreeMaps keep the row order stable across runs
        let mut linked: BTreeMap<String, f64> = BTreeMap::new();
        let mut unlinked: BTreeMap<String, f64> = BTreeMap::new();
        let mut total = 0.0;
        for entry in &entries {
            match self.identity_service.resolve_contributor(&entry.git_email)? {
                Some(user_id) => {
                    *linked.entry(user_id).or_insert(0.0) += entry.weight;
                    total += entry.weight;
                }
                None => {
                    *unlinked.entry(entry.git_email.clone()).or_insert(0.0) += entry.weight;
                }
            }
        }

        for (git_email, weight) in &unlinked {
            // informational: what this identity would earn if it were linked
            let notional = weighted_share(share.per_repo_future_add, *weight, total + *weight);
            run.unclaimed.push(UnclaimedContribution {
                id: Uuid::new_v4().to_string(),
                git_email: git_email.clone(),
                repo_id: repo_id.to_string(),
                amount: notional,
                currency: share.currency.clone(),
                day,
                created_at: now,
            });
        }

        if linked.is_empty() {
            debug!("no linked contributors for repo {}, parking deduction", repo_id);
            run.future
                .push(self.future_row(sponsor_id, repo_id, share.per_repo_deduct, share, day, now));
            return Ok(());
        }

        let distributable = match share.per_repo_future_net {
            Some(net) => {
                run.future
                    .push(self.future_row(sponsor_id, repo_id, net, share, day, now));
                share.per_repo_future_add + share.per_repo_deduct
            }
            None => share.per_repo_future_add,
        };

        let mut distributed = Decimal::ZERO;
        for (contributor_id, weight) in &linked {
            let amount = weighted_share(distributable, *weight, total);
            distributed += amount;
            run.daily.push(DailyContribution {
                id: Uuid::new_v4().to_string(),
                sponsor_id: sponsor_id.to_string(),
                contributor_id: contributor_id.clone(),
                repo_id: repo_id.to_string(),
                amount,
                currency: share.currency.clone(),
                day,
                foundation: false,
                created_at: now,
            });
        }

        let residue = distributable - distributed;
        let max_residue = Decimal::from(linked.len() as i64 - 1);
        if distributed > distributable || residue > max_residue {
            error!(
                "conservation violation for sponsor {} repo {}: distributed {} of {} with residue {}",
                sponsor_id, repo_id, distributed, distributable, residue
            );
            return Err(SettlementError::ConservationViolation(format!(
                "repo {}: distributed {} of {} across {} contributors",
                repo_id,
                distributed,
                distributable,
                linked.len()
            ))
            .into());
        }

        Ok(())
    }

    fn future_row(
        &self,
        sponsor_id: &str,
        repo_id: &str,
        amount: Decimal,
        share: &Share,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> FutureContribution {
        FutureContribution {
            id: Uuid::new_v4().to_string(),
            sponsor_id: sponsor_id.to_string(),
            repo_id: repo_id.to_string(),
            amount,
            currency: share.currency.clone(),
            day,
            foundation: false,
            created_at: now,
        }
    }
}
