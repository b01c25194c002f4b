use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use fairshare_core::attribution::{
    AttributionEntry, AttributionRepositoryTrait, AttributionRequest,
};
use fairshare_core::errors::DatabaseError;
use fairshare_core::Result;

use super::model::{AttributionEntryDB, AttributionRequestDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{attribution_entries, attribution_requests};

pub struct AttributionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AttributionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AttributionRepositoryTrait for AttributionRepository {
    async fn insert_request(&self, request: AttributionRequest) -> Result<AttributionRequest> {
        self.writer
            .exec(move |conn| -> Result<AttributionRequest> {
                let row = AttributionRequestDB::from_domain(&request, request.date_to.naive_utc());
                diesel::insert_into(attribution_requests::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(request)
            })
            .await
    }

    fn latest_request(&self, repo: &str) -> Result<Option<AttributionRequest>> {
        let mut conn = get_connection(&self.pool)?;
        let row = attribution_requests::table
            .filter(attribution_requests::repo_id.eq(repo))
            .order(attribution_requests::date_to.desc())
            .first::<AttributionRequestDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(AttributionRequest::from))
    }

    fn stale_requests(&self, cutoff: DateTime<Utc>) -> Result<Vec<AttributionRequest>> {
        let mut conn = get_connection(&self.pool)?;
        // newest window first, so the fold keeps exactly the latest request
        // per repo before applying the cutoff
        let rows = attribution_requests::table
            .order(attribution_requests::date_to.desc())
            .load::<AttributionRequestDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut latest_per_repo: HashMap<String, AttributionRequestDB> = HashMap::new();
        for row in rows {
            latest_per_repo.entry(row.repo_id.clone()).or_insert(row);
        }

        let mut stale: Vec<AttributionRequest> = latest_per_repo
            .into_values()
            .filter(|row| row.date_to <= cutoff.naive_utc())
            .map(AttributionRequest::from)
            .collect();
        stale.sort_by(|a, b| a.repo_id.cmp(&b.repo_id));
        Ok(stale)
    }

    fn entries_for_request(&self, request: &str) -> Result<Vec<AttributionEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = attribution_entries::table
            .filter(attribution_entries::request_id.eq(request))
            .load::<AttributionEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(AttributionEntry::try_from).collect()
    }

    async fn store_result(
        &self,
        request: &str,
        entries: Vec<AttributionEntry>,
        received: DateTime<Utc>,
    ) -> Result<usize> {
        let request = request.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                let updated = diesel::update(
                    attribution_requests::table.filter(attribution_requests::id.eq(&request)),
                )
                .set(attribution_requests::received_at.eq(received.naive_utc()))
                .execute(conn)
                .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(DatabaseError::NotFound(format!(
                        "attribution request {} not found",
                        request
                    ))
                    .into());
                }

                let rows = entries
                    .iter()
                    .map(|entry| AttributionEntryDB::from_domain(entry, received.naive_utc()))
                    .collect::<Result<Vec<_>>>()?;
                for row in &rows {
                    diesel::insert_into(attribution_entries::table)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(rows.len())
            })
            .await
    }
}
