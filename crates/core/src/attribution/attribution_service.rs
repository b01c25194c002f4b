use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use uuid::Uuid;

use super::attribution_model::{AttributionEntry, AttributionRequest, AttributionWeight};
use super::attribution_traits::{AttributionRepositoryTrait, AttributionServiceTrait};
use crate::Result;

/// Service for attribution windows and delivered results.
pub struct AttributionService {
    repository: Arc<dyn AttributionRepositoryTrait>,
}

impl AttributionService {
    pub fn new(repository: Arc<dyn AttributionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AttributionServiceTrait for AttributionService {
    async fn record_request(
        &self,
        repo_id: &str,
        git_url: &str,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> Result<AttributionRequest> {
        let request = AttributionRequest {
            id: Uuid::new_v4().to_string(),
            repo_id: repo_id.to_string(),
            git_url: git_url.to_string(),
            date_from,
            date_to,
            received_at: None,
        };
        self.repository.insert_request(request).await
    }

    async fn ingest_attribution(
        &self,
        request_id: &str,
        weights: Vec<AttributionWeight>,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let mut entries = Vec::with_capacity(weights.len());
        for incoming in weights {
            if !incoming.weight.is_finite() || incoming.weight <= 0.0 {
                warn!(
                    "dropping attribution entry for {} in request {}: weight {}",
                    incoming.git_email, request_id, incoming.weight
                );
                continue;
            }
            entries.push(AttributionEntry {
                id: Uuid::new_v4().to_string(),
                request_id: request_id.to_string(),
                git_email: incoming.git_email,
                git_names: incoming.git_names,
                weight: incoming.weight,
            });
        }
        self.repository.store_result(request_id, entries, now).await
    }

    fn latest_entries(&self, repo_id: &str) -> Result<Vec<AttributionEntry>> {
        match self.repository.latest_request(repo_id)? {
            Some(request) if request.received_at.is_some() => {
                self.repository.entries_for_request(&request.id)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn latest_request(&self, repo_id: &str) -> Result<Option<AttributionRequest>> {
        self.repository.latest_request(repo_id)
    }

    fn stale_requests(&self, cutoff: DateTime<Utc>) -> Result<Vec<AttributionRequest>> {
        self.repository.stale_requests(cutoff)
    }
}
