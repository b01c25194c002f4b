use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use rust_decimal::Decimal;

use fairshare_core::contributions::{ContributionRepositoryTrait, SettlementRun};
use fairshare_core::Result;

use super::model::{DailyContributionDB, FutureContributionDB, UnclaimedContributionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{daily_contributions, future_contributions, unclaimed_contributions};

pub struct ContributionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ContributionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn fold_sums(rows: Vec<(String, String)>) -> Result<HashMap<String, Decimal>> {
        let mut sums = HashMap::new();
        for (row_currency, row_amount) in rows {
            let parsed = Decimal::from_str(&row_amount)?;
            *sums.entry(row_currency).or_insert(Decimal::ZERO) += parsed;
        }
        Ok(sums)
    }
}

#[async_trait]
impl ContributionRepositoryTrait for ContributionRepository {
    async fn commit_run(&self, run: SettlementRun) -> Result<()> {
        let row_count = run.row_count();
        self.writer
            .exec(move |conn| -> Result<()> {
                // one immediate transaction for the whole run: a duplicate
                // settlement key rolls back every row inserted so far
                for row in run.daily {
                    let db_row = DailyContributionDB::from(row);
                    diesel::insert_into(daily_contributions::table)
                        .values(&db_row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                for row in run.future {
                    let db_row = FutureContributionDB::from(row);
                    diesel::insert_into(future_contributions::table)
                        .values(&db_row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                for row in run.unclaimed {
                    let db_row = UnclaimedContributionDB::from(row);
                    diesel::insert_into(unclaimed_contributions::table)
                        .values(&db_row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await?;
        debug!("committed settlement run with {} rows", row_count);
        Ok(())
    }

    fn sum_daily_by_sponsor(&self, sponsor: &str) -> Result<HashMap<String, Decimal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = daily_contributions::table
            .filter(daily_contributions::sponsor_id.eq(sponsor))
            .select((daily_contributions::currency, daily_contributions::amount))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Self::fold_sums(rows)
    }

    fn sum_future_by_sponsor(&self, sponsor: &str) -> Result<HashMap<String, Decimal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = future_contributions::table
            .filter(future_contributions::sponsor_id.eq(sponsor))
            .select((future_contributions::currency, future_contributions::amount))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Self::fold_sums(rows)
    }

    fn sum_daily_by_contributor(&self, contributor: &str) -> Result<HashMap<String, Decimal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = daily_contributions::table
            .filter(daily_contributions::contributor_id.eq(contributor))
            .select((daily_contributions::currency, daily_contributions::amount))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Self::fold_sums(rows)
    }

    fn sum_daily_by_repo(&self, repo: &str) -> Result<HashMap<String, Decimal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = daily_contributions::table
            .filter(daily_contributions::repo_id.eq(repo))
            .select((daily_contributions::currency, daily_contributions::amount))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Self::fold_sums(rows)
    }

    fn sum_future_by_repo(&self, repo: &str) -> Result<HashMap<String, Decimal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = future_contributions::table
            .filter(future_contributions::repo_id.eq(repo))
            .select((future_contributions::currency, future_contributions::amount))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Self::fold_sums(rows)
    }
}
