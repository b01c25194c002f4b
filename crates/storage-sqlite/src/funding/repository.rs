use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use rust_decimal::Decimal;

use fairshare_core::funding::{FundingEvent, FundingRepositoryTrait, FundingStatus};
use fairshare_core::Result;

use super::model::FundingEventDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::funding_events::dsl::*;

pub struct FundingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FundingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FundingRepositoryTrait for FundingRepository {
    async fn insert_event(&self, event: FundingEvent) -> Result<FundingEvent> {
        self.writer
            .exec(move |conn| -> Result<FundingEvent> {
                let row = FundingEventDB::from(event.clone());
                diesel::insert_into(funding_events)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(event)
            })
            .await
    }

    async fn insert_settled_pair(
        &self,
        success: FundingEvent,
        fee: FundingEvent,
    ) -> Result<()> {
        self.writer
            .exec(move |conn| -> Result<()> {
                let success_row = FundingEventDB::from(success);
                let fee_row = FundingEventDB::from(fee);
                diesel::insert_into(funding_events)
                    .values(&success_row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::insert_into(funding_events)
                    .values(&fee_row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn find_by_external_id(
        &self,
        external: &str,
        event_status: FundingStatus,
    ) -> Result<Option<FundingEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let row = funding_events
            .filter(external_id.eq(external))
            .filter(status.eq(event_status.as_str()))
            .first::<FundingEventDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(FundingEvent::try_from).transpose()
    }

    fn events_for_user(&self, user: &str) -> Result<Vec<FundingEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = funding_events
            .filter(user_id.eq(user))
            .order(created_at.asc())
            .load::<FundingEventDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(FundingEvent::try_from).collect()
    }

    fn sum_by_currency(
        &self,
        user: &str,
        event_status: FundingStatus,
    ) -> Result<HashMap<String, Decimal>> {
        let mut conn = get_connection(&self.pool)?;
        // amounts live in TEXT columns; summing happens in exact decimals
        // here, never in SQL
        let rows = funding_events
            .filter(user_id.eq(user))
            .filter(status.eq(event_status.as_str()))
            .select((currency, amount))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;

        let mut sums = HashMap::new();
        for (row_currency, row_amount) in rows {
            let parsed = Decimal::from_str(&row_amount)?;
            *sums.entry(row_currency).or_insert(Decimal::ZERO) += parsed;
        }
        Ok(sums)
    }

    fn latest_success(&self, user: &str, in_currency: &str) -> Result<Option<FundingEvent>> {
        let mut conn = get_connection(&self.pool)?;
        let row = funding_events
            .filter(user_id.eq(user))
            .filter(currency.eq(in_currency))
            .filter(status.eq(FundingStatus::Success.as_str()))
            .order(created_at.desc())
            .first::<FundingEventDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(FundingEvent::try_from).transpose()
    }
}
