use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde_json::json;

use super::calculator::SettlementCalculator;
use super::distribution::DistributionEngine;
use crate::attribution::{AttributionServiceTrait, AttributionSourceTrait};
use crate::identity::IdentityServiceTrait;
use crate::notifications::{NotificationKind, NotificationService};
use crate::relationships::RelationshipServiceTrait;
use crate::utils::{day_window, settlement_day};
use crate::Result;

/// Tunables for the batch passes.
#[derive(Debug, Clone)]
pub struct SettlementConfig {
    /// How old a repo's latest attribution window may be before the hourly
    /// pass requests a fresh one.
    pub attribution_staleness: Duration,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            attribution_staleness: Duration::days(1),
        }
    }
}

/// Summary of one daily pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyReport {
    pub settled: usize,
    pub already_settled: usize,
    pub out_of_funds: usize,
}

/// Summary of one hourly pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyReport {
    pub refreshed: usize,
    pub failed: usize,
}

/// Drives the hourly attribution refresh and the daily settlement pass.
///
/// Both entry points take their instant as a parameter; nothing here reads
/// the wall clock. A single active orchestrator instance is assumed.
pub struct BatchOrchestrator {
    relationship_service: Arc<dyn RelationshipServiceTrait>,
    identity_service: Arc<dyn IdentityServiceTrait>,
    attribution_service: Arc<dyn AttributionServiceTrait>,
    attribution_source: Arc<dyn AttributionSourceTrait>,
    notification_service: Arc<NotificationService>,
    calculator: SettlementCalculator,
    distribution: DistributionEngine,
    config: SettlementConfig,
}

impl BatchOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        relationship_service: Arc<dyn RelationshipServiceTrait>,
        identity_service: Arc<dyn IdentityServiceTrait>,
        attribution_service: Arc<dyn AttributionServiceTrait>,
        attribution_source: Arc<dyn AttributionSourceTrait>,
        notification_service: Arc<NotificationService>,
        calculator: SettlementCalculator,
        distribution: DistributionEngine,
        config: SettlementConfig,
    ) -> Self {
        Self {
            relationship_service,
            identity_service,
            attribution_service,
            attribution_source,
            notification_service,
            calculator,
            distribution,
            config,
        }
    }

    /// Settles every sponsor with an open Sponsor relationship overlapping
    /// [yesterday 00:00, today 00:00).
    ///
    /// A sponsor whose commit trips the daily uniqueness constraint was
    /// already settled for that day and is skipped; that rejection is the
    /// only idempotency mechanism. Any other error aborts the pass.
    pub async fn run_daily(&self, now: DateTime<Utc>) -> Result<DailyReport> {
        let (start, stop) = day_window(now);
        let day = settlement_day(start);
        info!("daily settlement pass for {} ({} to {})", day, start, stop);

        let sponsor_sets = self.relationship_service.sponsors_between(start, stop)?;
        let cycle = day.to_string();
        let mut report = DailyReport::default();

        for set in sponsor_sets {
            if set.repo_ids.is_empty() {
                continue;
            }

            let source = self.identity_service.resolve_funding_source(&set.sponsor_id)?;
            let share = self
                .calculator
                .compute_share(&source.paying_user_id, set.repo_ids.len() as i64)?;

            let share = match share {
                Some(share) => share,
                None => {
                    debug!("user {} is out of funds", source.paying_user_id);
                    self.notification_service
                        .notify_once(
                            &source.paying_user_id,
                            NotificationKind::OutOfFunds,
                            &cycle,
                            json!({ "sponsorId": set.sponsor_id }),
                            now,
                        )
                        .await;
                    report.out_of_funds += 1;
                    continue;
                }
            };

            if share.days_remaining <= 1 {
                self.notification_service
                    .notify_once(
                        &source.paying_user_id,
                        NotificationKind::LowFunds,
                        &cycle,
                        json!({
                            "sponsorId": set.sponsor_id,
                            "currency": share.currency,
                            "daysRemaining": share.days_remaining,
                        }),
                        now,
                    )
                    .await;
            }

            match self
                .distribution
                .distribute(&set.sponsor_id, &set.repo_ids, day, &share, now)
                .await
            {
                Ok(()) => report.settled += 1,
                Err(err) if err.is_unique_violation() => {
                    info!("sponsor {} already settled for {}, skipping", set.sponsor_id, day);
                    report.already_settled += 1;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "daily pass done: {} settled, {} already settled, {} out of funds",
            report.settled, report.already_settled, report.out_of_funds
        );
        Ok(report)
    }

    /// Requests fresh attribution for repos whose latest window ended at or
    /// before `now - attribution_staleness`. Dispatch failures are logged
    /// and retried on the next pass, never inline.
    pub async fn run_hourly(&self, now: DateTime<Utc>) -> Result<HourlyReport> {
        let cutoff = now - self.config.attribution_staleness;
        let stale = self.attribution_service.stale_requests(cutoff)?;
        info!("hourly attribution check with {} stale entries", stale.len());

        let mut report = HourlyReport::default();
        for request in stale {
            match self
                .attribution_source
                .request_attribution(&request.repo_id, &request.git_url, request.date_to, now)
                .await
            {
                Ok(()) => {
                    self.attribution_service
                        .record_request(&request.repo_id, &request.git_url, request.date_to, now)
                        .await?;
                    report.refreshed += 1;
                }
                Err(err) => {
                    warn!("attribution request for repo {} failed: {}", request.repo_id, err);
                    report.failed += 1;
                }
            }
        }

        info!(
            "hourly pass done: {} refreshed, {} failed",
            report.refreshed, report.failed
        );
        Ok(report)
    }
}
