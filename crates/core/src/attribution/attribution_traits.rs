use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::attribution_model::{AttributionEntry, AttributionRequest, AttributionWeight};
use crate::Result;

/// Trait defining the contract for attribution storage.
#[async_trait]
pub trait AttributionRepositoryTrait: Send + Sync {
    async fn insert_request(&self, request: AttributionRequest) -> Result<AttributionRequest>;

    /// The request with the latest `date_to` for a repo, received or not.
    fn latest_request(&self, repo_id: &str) -> Result<Option<AttributionRequest>>;

    /// Per repo, the latest request, filtered to windows that ended at or
    /// before the cutoff. Feeds the hourly staleness refresh.
    fn stale_requests(&self, cutoff: DateTime<Utc>) -> Result<Vec<AttributionRequest>>;

    fn entries_for_request(&self, request_id: &str) -> Result<Vec<AttributionEntry>>;

    /// Stores a delivered result: marks the request received and appends its
    /// entries, in one transaction.
    async fn store_result(
        &self,
        request_id: &str,
        entries: Vec<AttributionEntry>,
        received_at: DateTime<Utc>,
    ) -> Result<usize>;
}

/// The external analysis source. Results arrive asynchronously through
/// `AttributionServiceTrait::ingest_attribution`.
#[async_trait]
pub trait AttributionSourceTrait: Send + Sync {
    async fn request_attribution(
        &self,
        repo_id: &str,
        git_url: &str,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> Result<()>;
}

/// Trait defining the contract for attribution operations.
#[async_trait]
pub trait AttributionServiceTrait: Send + Sync {
    /// Records a new analysis window for a repo.
    async fn record_request(
        &self,
        repo_id: &str,
        git_url: &str,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> Result<AttributionRequest>;

    /// Ingests a delivered result. Entries with non-finite or non-positive
    /// weight are dropped. Returns the number of stored entries.
    async fn ingest_attribution(
        &self,
        request_id: &str,
        weights: Vec<AttributionWeight>,
        now: DateTime<Utc>,
    ) -> Result<usize>;

    /// The entry set of the repo's latest window; empty when no window
    /// exists or none was delivered yet.
    fn latest_entries(&self, repo_id: &str) -> Result<Vec<AttributionEntry>>;

    fn latest_request(&self, repo_id: &str) -> Result<Option<AttributionRequest>>;

    fn stale_requests(&self, cutoff: DateTime<Utc>) -> Result<Vec<AttributionRequest>>;
}
