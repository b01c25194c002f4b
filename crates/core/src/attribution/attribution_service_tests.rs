#[cfg(test)]
mod tests {
    use crate::attribution::{
        AttributionEntry, AttributionRepositoryTrait, AttributionRequest, AttributionService,
        AttributionServiceTrait, AttributionWeight,
    };
    use crate::errors::{DatabaseError, Error};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockAttributionRepository {
        requests: Arc<Mutex<Vec<AttributionRequest>>>,
        entries: Arc<Mutex<Vec<AttributionEntry>>>,
    }

    #[async_trait]
    impl AttributionRepositoryTrait for MockAttributionRepository {
        async fn insert_request(
            &self,
            request: AttributionRequest,
        ) -> crate::Result<AttributionRequest> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(request)
        }

        fn latest_request(&self, repo_id: &str) -> crate::Result<Option<AttributionRequest>> {
            let requests = self.requests.lock().unwrap();
            Ok(requests
                .iter()
                .filter(|r| r.repo_id == repo_id)
                .max_by_key(|r| r.date_to)
                .cloned())
        }

        fn stale_requests(
            &self,
            cutoff: DateTime<Utc>,
        ) -> crate::Result<Vec<AttributionRequest>> {
            let requests = self.requests.lock().unwrap();
            let mut repo_ids: Vec<String> =
                requests.iter().map(|r| r.repo_id.clone()).collect();
            repo_ids.sort();
            repo_ids.dedup();
            let mut stale = Vec::new();
            for repo_id in repo_ids {
                if let Some(latest) = requests
                    .iter()
                    .filter(|r| r.repo_id == repo_id)
                    .max_by_key(|r| r.date_to)
                {
                    if latest.date_to <= cutoff {
                        stale.push(latest.clone());
                    }
                }
            }
            Ok(stale)
        }

        fn entries_for_request(
            &self,
            request_id: &str,
        ) -> crate::Result<Vec<AttributionEntry>> {
            let entries = self.entries.lock().unwrap();
            Ok(entries
                .iter()
                .filter(|e| e.request_id == request_id)
                .cloned()
                .collect())
        }

        async fn store_result(
            &self,
            request_id: &str,
            new_entries: Vec<AttributionEntry>,
            received_at: DateTime<Utc>,
        ) -> crate::Result<usize> {
            let mut requests = self.requests.lock().unwrap();
            let request = requests
                .iter_mut()
                .find(|r| r.id == request_id)
                .ok_or_else(|| {
                    Error::Database(DatabaseError::NotFound(request_id.to_string()))
                })?;
            request.received_at = Some(received_at);
            let count = new_entries.len();
            self.entries.lock().unwrap().extend(new_entries);
            Ok(count)
        }
    }

    fn service() -> (AttributionService, MockAttributionRepository) {
        let repo = MockAttributionRepository::default();
        (AttributionService::new(Arc::new(repo.clone())), repo)
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap()
    }

    fn weight(email: &str, w: f64) -> AttributionWeight {
        AttributionWeight {
            git_email: email.to_string(),
            git_names: vec![email.split('@').next().unwrap().to_string()],
            weight: w,
        }
    }

    #[tokio::test]
    async fn ingest_drops_invalid_weights() {
        let (service, _) = service();
        let request = service
            .record_request("repo-1", "https://example.com/repo.git", at(1), at(8))
            .await
            .unwrap();

        let stored = service
            .ingest_attribution(
                &request.id,
                vec![
                    weight("a@example.com", 0.6),
                    weight("b@example.com", 0.0),
                    weight("c@example.com", -0.2),
                    weight("d@example.com", f64::NAN),
                    weight("e@example.com", 0.4),
                ],
                at(9),
            )
            .await
            .unwrap();

        assert_eq!(stored, 2);
        let entries = service.latest_entries("repo-1").unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.weight > 0.0));
    }

    #[tokio::test]
    async fn latest_entries_empty_without_delivered_window() {
        let (service, _) = service();
        assert!(service.latest_entries("repo-1").unwrap().is_empty());

        // a pending window is still not a delivered one
        service
            .record_request("repo-1", "https://example.com/repo.git", at(1), at(8))
            .await
            .unwrap();
        assert!(service.latest_entries("repo-1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn latest_entries_follow_the_newest_window() {
        let (service, _) = service();
        let first = service
            .record_request("repo-1", "https://example.com/repo.git", at(1), at(8))
            .await
            .unwrap();
        service
            .ingest_attribution(&first.id, vec![weight("a@example.com", 1.0)], at(9))
            .await
            .unwrap();

        let second = service
            .record_request("repo-1", "https://example.com/repo.git", at(8), at(15))
            .await
            .unwrap();
        service
            .ingest_attribution(
                &second.id,
                vec![weight("b@example.com", 0.7), weight("c@example.com", 0.3)],
                at(16),
            )
            .await
            .unwrap();

        let entries = service.latest_entries("repo-1").unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.request_id == second.id));
    }

    #[tokio::test]
    async fn stale_requests_report_old_windows_once_per_repo() {
        let (service, _) = service();
        service
            .record_request("repo-1", "https://example.com/a.git", at(1), at(5))
            .await
            .unwrap();
        service
            .record_request("repo-1", "https://example.com/a.git", at(5), at(10))
            .await
            .unwrap();
        service
            .record_request("repo-2", "https://example.com/b.git", at(1), at(20))
            .await
            .unwrap();

        let stale = service.stale_requests(at(12)).unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].repo_id, "repo-1");
        assert_eq!(stale[0].date_to, at(10));
    }
}
