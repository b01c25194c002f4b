//! Integration tests over a real SQLite database.
//!
//! These exercise the constraints the core logic depends on: the partial
//! unique index behind the relationship state machine, the settlement key
//! behind idempotency-by-rejection, the atomicity of a committed run, and
//! the notification dedup key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

use fairshare_core::attribution::{
    AttributionService, AttributionServiceTrait, AttributionSourceTrait, AttributionWeight,
};
use fairshare_core::contributions::{
    ContributionRepositoryTrait, ContributionService, ContributionServiceTrait, DailyContribution,
    FutureContribution, SettlementRun,
};
use fairshare_core::errors::Error;
use fairshare_core::funding::{FundingService, FundingServiceTrait, NewFundingEvent};
use fairshare_core::identity::{IdentityService, IdentityServiceTrait, NewUser};
use fairshare_core::notifications::{
    NotificationKind, NotificationLogRepositoryTrait, NotificationService, NotificationSinkTrait,
};
use fairshare_core::relationships::{
    RelationshipChange, RelationshipError, RelationshipEvent, RelationshipKind,
    RelationshipRepositoryTrait, RelationshipService, RelationshipServiceTrait,
};
use fairshare_core::settlement::{
    BatchOrchestrator, DistributionEngine, SettlementCalculator, SettlementConfig,
};
use fairshare_storage_sqlite::attribution::AttributionRepository;
use fairshare_storage_sqlite::contributions::ContributionRepository;
use fairshare_storage_sqlite::funding::FundingRepository;
use fairshare_storage_sqlite::identity::UserRepository;
use fairshare_storage_sqlite::notifications::NotificationLogRepository;
use fairshare_storage_sqlite::relationships::RelationshipRepository;
use fairshare_storage_sqlite::{init, spawn_writer, DbPool, WriteHandle};

struct TestDb {
    // dropping the TempDir deletes the database file
    _dir: TempDir,
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fairshare.db");
    let pool = init(path.to_str().unwrap()).expect("init database");
    let writer = spawn_writer(pool.clone());
    TestDb {
        _dir: dir,
        pool,
        writer,
    }
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
}

fn sponsor_change(actor: &str, repo: &str, active: Option<DateTime<Utc>>, inactive: Option<DateTime<Utc>>) -> RelationshipChange {
    RelationshipChange {
        actor_id: actor.to_string(),
        repo_id: repo.to_string(),
        kind: RelationshipKind::Sponsor,
        active_at: active,
        inactive_at: inactive,
    }
}

#[tokio::test]
async fn partial_index_rejects_concurrent_double_open() {
    let db = test_db();
    let repo = RelationshipRepository::new(db.pool.clone(), db.writer.clone());

    let event = |id: &str| RelationshipEvent {
        id: id.to_string(),
        actor_id: "user-1".to_string(),
        repo_id: "repo-1".to_string(),
        kind: RelationshipKind::Sponsor,
        active_at: at(1, 12),
        inactive_at: None,
    };

    repo.insert_open(event("first")).await.unwrap();
    // bypasses the service pre-check on purpose: the index itself must hold
    let err = repo.insert_open(event("second")).await.unwrap_err();
    assert!(err.is_unique_violation());
}

#[tokio::test]
async fn relationship_lifecycle_round_trips() {
    let db = test_db();
    let service = RelationshipService::new(Arc::new(RelationshipRepository::new(
        db.pool.clone(),
        db.writer.clone(),
    )));

    service
        .open_relationship(sponsor_change("user-1", "repo-1", Some(at(1, 12)), None))
        .await
        .unwrap();

    // double open through the service is a state conflict
    let err = service
        .open_relationship(sponsor_change("user-1", "repo-1", Some(at(2, 12)), None))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Relationship(RelationshipError::StateConflict(_))
    ));

    let closed = service
        .close_relationship(sponsor_change("user-1", "repo-1", None, Some(at(3, 12))))
        .await
        .unwrap();
    assert_eq!(closed.inactive_at, Some(at(3, 12)));

    // closing again has nothing left to close
    let err = service
        .close_relationship(sponsor_change("user-1", "repo-1", None, Some(at(4, 12))))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Relationship(RelationshipError::StateConflict(_))
    ));

    // reopening after the close is allowed again
    service
        .open_relationship(sponsor_change("user-1", "repo-1", Some(at(5, 12)), None))
        .await
        .unwrap();

    let sets = service.sponsors_between(at(10, 0), at(11, 0)).unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].repo_ids, vec!["repo-1"]);
}

#[tokio::test]
async fn committed_run_is_atomic_under_the_settlement_key() {
    let db = test_db();
    let repo = ContributionRepository::new(db.pool.clone(), db.writer.clone());
    let day = at(1, 0).date_naive();

    let daily_row = |id: &str| DailyContribution {
        id: id.to_string(),
        sponsor_id: "sponsor".to_string(),
        contributor_id: "dev".to_string(),
        repo_id: "repo-1".to_string(),
        amount: dec!(100),
        currency: "USD".to_string(),
        day,
        foundation: false,
        created_at: at(2, 0),
    };
    let future_row = |id: &str| FutureContribution {
        id: id.to_string(),
        sponsor_id: "sponsor".to_string(),
        repo_id: "repo-2".to_string(),
        amount: dec!(40),
        currency: "USD".to_string(),
        day,
        foundation: false,
        created_at: at(2, 0),
    };

    repo.commit_run(SettlementRun {
        daily: vec![daily_row("d1")],
        future: vec![future_row("f1")],
        unclaimed: vec![],
    })
    .await
    .unwrap();

    // same settlement key again: the whole run must be rejected
    let err = repo
        .commit_run(SettlementRun {
            daily: vec![daily_row("d2")],
            future: vec![future_row("f2")],
            unclaimed: vec![],
        })
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    // the rejected run's future row was rolled back with it
    let future_sums = repo.sum_future_by_sponsor("sponsor").unwrap();
    assert_eq!(future_sums["USD"], dec!(40));
    let daily_sums = repo.sum_daily_by_sponsor("sponsor").unwrap();
    assert_eq!(daily_sums["USD"], dec!(100));
}

#[tokio::test]
async fn funding_confirmation_and_sums_round_trip() {
    let db = test_db();
    let service = FundingService::new(Arc::new(FundingRepository::new(
        db.pool.clone(),
        db.writer.clone(),
    )));

    service
        .record_funding(
            NewFundingEvent {
                external_id: "ext-1".to_string(),
                user_id: "user-1".to_string(),
                amount: dec!(125_470_000),
                currency: "USD".to_string(),
                seats: 1,
                freq: 365,
            },
            at(1, 8),
        )
        .await
        .unwrap();
    service
        .confirm_funding("ext-1", dec!(470_000), at(1, 9))
        .await
        .unwrap();
    // a repeated gateway callback is absorbed
    service
        .confirm_funding("ext-1", dec!(470_000), at(1, 10))
        .await
        .unwrap();

    let strategy = service
        .select_spend_strategy("user-1", &HashMap::new(), &HashMap::new())
        .unwrap()
        .unwrap();
    assert_eq!(strategy.currency, "USD");
    assert_eq!(strategy.per_day, dec!(342_465));
    assert_eq!(strategy.days_remaining, 365);
}

#[tokio::test]
async fn notification_key_claims_exactly_once() {
    let db = test_db();
    let log = NotificationLogRepository::new(db.pool.clone(), db.writer.clone());

    assert!(log
        .try_claim("user-1", NotificationKind::LowFunds, "2024-06-01", at(2, 0))
        .await
        .unwrap());
    assert!(!log
        .try_claim("user-1", NotificationKind::LowFunds, "2024-06-01", at(2, 1))
        .await
        .unwrap());
    // a different cycle claims fresh
    assert!(log
        .try_claim("user-1", NotificationKind::LowFunds, "2024-06-02", at(3, 0))
        .await
        .unwrap());
}

#[tokio::test]
async fn attribution_windows_round_trip() {
    let db = test_db();
    let service = AttributionService::new(Arc::new(AttributionRepository::new(
        db.pool.clone(),
        db.writer.clone(),
    )));

    let request = service
        .record_request("repo-1", "https://example.com/repo.git", at(1, 0), at(8, 0))
        .await
        .unwrap();

    // not delivered yet: no entries, but stale once past the cutoff
    assert!(service.latest_entries("repo-1").unwrap().is_empty());
    let stale = service.stale_requests(at(9, 0)).unwrap();
    assert_eq!(stale.len(), 1);

    let stored = service
        .ingest_attribution(
            &request.id,
            vec![
                AttributionWeight {
                    git_email: "a@example.com".to_string(),
                    git_names: vec!["a".to_string()],
                    weight: 0.7,
                },
                AttributionWeight {
                    git_email: "b@example.com".to_string(),
                    git_names: vec![],
                    weight: -1.0,
                },
            ],
            at(8, 6),
        )
        .await
        .unwrap();
    assert_eq!(stored, 1);

    let entries = service.latest_entries("repo-1").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].git_email, "a@example.com");
    assert_eq!(entries[0].git_names, vec!["a"]);
}

// --- external collaborators for the end-to-end run ---

#[derive(Clone, Default)]
struct RecordingSink {
    delivered: Arc<Mutex<Vec<(String, NotificationKind)>>>,
}

#[async_trait]
impl NotificationSinkTrait for RecordingSink {
    async fn deliver(
        &self,
        recipient: &str,
        kind: NotificationKind,
        _payload: Value,
    ) -> fairshare_core::Result<()> {
        self.delivered
            .lock()
            .unwrap()
            .push((recipient.to_string(), kind));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct NullSource;

#[async_trait]
impl AttributionSourceTrait for NullSource {
    async fn request_attribution(
        &self,
        _repo_id: &str,
        _git_url: &str,
        _date_from: DateTime<Utc>,
        _date_to: DateTime<Utc>,
    ) -> fairshare_core::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn daily_settlement_end_to_end_is_idempotent() {
    let db = test_db();

    let relationship_repo = Arc::new(RelationshipRepository::new(
        db.pool.clone(),
        db.writer.clone(),
    ));
    let user_repo = Arc::new(UserRepository::new(db.pool.clone(), db.writer.clone()));
    let funding_repo = Arc::new(FundingRepository::new(db.pool.clone(), db.writer.clone()));
    let contribution_repo = Arc::new(ContributionRepository::new(
        db.pool.clone(),
        db.writer.clone(),
    ));
    let attribution_repo = Arc::new(AttributionRepository::new(
        db.pool.clone(),
        db.writer.clone(),
    ));
    let notification_log = Arc::new(NotificationLogRepository::new(
        db.pool.clone(),
        db.writer.clone(),
    ));

    let relationships: Arc<dyn RelationshipServiceTrait> =
        Arc::new(RelationshipService::new(relationship_repo));
    let identity: Arc<dyn IdentityServiceTrait> =
        Arc::new(IdentityService::new(user_repo.clone()));
    let funding = Arc::new(FundingService::new(funding_repo));
    let attribution: Arc<dyn AttributionServiceTrait> =
        Arc::new(AttributionService::new(attribution_repo));
    let sink = RecordingSink::default();
    let notifications = Arc::new(NotificationService::new(
        notification_log,
        Arc::new(sink.clone()),
    ));

    let calculator = SettlementCalculator::new(
        funding.clone(),
        identity.clone(),
        contribution_repo.clone(),
    );
    let distribution = DistributionEngine::new(
        attribution.clone(),
        identity.clone(),
        contribution_repo.clone(),
    );
    let orchestrator = BatchOrchestrator::new(
        relationships.clone(),
        identity.clone(),
        attribution.clone(),
        Arc::new(NullSource),
        notifications,
        calculator,
        distribution,
        SettlementConfig::default(),
    );

    // a sponsor funding one repo with two linked contributors
    identity
        .create_user(
            NewUser {
                id: Some("sponsor".to_string()),
                invited_by: None,
            },
            at(1, 0),
        )
        .await
        .unwrap();
    for dev in ["dev-a", "dev-b"] {
        identity
            .create_user(
                NewUser {
                    id: Some(dev.to_string()),
                    invited_by: None,
                },
                at(1, 0),
            )
            .await
            .unwrap();
    }
    identity
        .link_git_identity("a@example.com", "dev-a", at(1, 0))
        .await
        .unwrap();
    identity
        .link_git_identity("b@example.com", "dev-b", at(1, 0))
        .await
        .unwrap();

    funding
        .record_funding(
            NewFundingEvent {
                external_id: Uuid::new_v4().to_string(),
                user_id: "sponsor".to_string(),
                amount: dec!(125_470_000),
                currency: "USD".to_string(),
                seats: 1,
                freq: 365,
            },
            at(1, 0),
        )
        .await
        .unwrap();
    let external = funding.events_for_user("sponsor").unwrap()[0]
        .external_id
        .clone();
    funding
        .confirm_funding(&external, dec!(470_000), at(1, 1))
        .await
        .unwrap();

    relationships
        .open_relationship(RelationshipChange {
            actor_id: "sponsor".to_string(),
            repo_id: "repo-1".to_string(),
            kind: RelationshipKind::Sponsor,
            active_at: Some(at(1, 2)),
            inactive_at: None,
        })
        .await
        .unwrap();

    let request = attribution
        .record_request("repo-1", "https://example.com/repo.git", at(1, 0), at(2, 0))
        .await
        .unwrap();
    attribution
        .ingest_attribution(
            &request.id,
            vec![
                AttributionWeight {
                    git_email: "a@example.com".to_string(),
                    git_names: vec![],
                    weight: 0.3,
                },
                AttributionWeight {
                    git_email: "b@example.com".to_string(),
                    git_names: vec![],
                    weight: 0.3,
                },
            ],
            at(2, 1),
        )
        .await
        .unwrap();

    // first pass settles, second pass is rejected by the settlement key
    let report = orchestrator.run_daily(at(3, 12)).await.unwrap();
    assert_eq!(report.settled, 1);
    // 365 days of funding left: no low-funds or out-of-funds notification
    assert!(sink.delivered.lock().unwrap().is_empty());

    let balances = ContributionService::new(contribution_repo.clone());
    let payable_a = balances.get_payable_balance("dev-a").unwrap();
    let payable_b = balances.get_payable_balance("dev-b").unwrap();
    assert_eq!(payable_a[0].amount, dec!(171_232));
    assert_eq!(payable_b[0].amount, dec!(171_232));

    let report = orchestrator.run_daily(at(3, 12)).await.unwrap();
    assert_eq!(report.settled, 0);
    assert_eq!(report.already_settled, 1);

    // nothing changed on the second attempt
    assert_eq!(
        balances.get_payable_balance("dev-a").unwrap()[0].amount,
        dec!(171_232)
    );
    let repo_balance = balances.get_repo_balance("repo-1").unwrap();
    assert_eq!(repo_balance[0].amount, dec!(342_464));
}
