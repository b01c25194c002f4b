use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::Value;

use super::notifications_model::NotificationKind;
use super::notifications_traits::{NotificationLogRepositoryTrait, NotificationSinkTrait};
use crate::utils::retry_transient;

const DELIVERY_ATTEMPTS: u32 = 3;

/// Service for deduplicated, fire-and-forget notifications.
///
/// `notify_once` never returns an error: a settlement run must not fail or
/// block because an email could not be sent. Claiming the idempotency key
/// happens inline; delivery is spawned and retried in the background.
pub struct NotificationService {
    log_repository: Arc<dyn NotificationLogRepositoryTrait>,
    sink: Arc<dyn NotificationSinkTrait>,
}

impl NotificationService {
    pub fn new(
        log_repository: Arc<dyn NotificationLogRepositoryTrait>,
        sink: Arc<dyn NotificationSinkTrait>,
    ) -> Self {
        Self {
            log_repository,
            sink,
        }
    }

    /// Sends one notification per (recipient, kind, cycle). Duplicates are
    /// silently skipped.
    pub async fn notify_once(
        &self,
        recipient: &str,
        kind: NotificationKind,
        cycle: &str,
        payload: Value,
        now: DateTime<Utc>,
    ) {
        let claimed = match self
            .log_repository
            .try_claim(recipient, kind, cycle, now)
            .await
        {
            Ok(claimed) => claimed,
            Err(err) => {
                warn!(
                    "could not claim notification key ({}, {}, {}): {}",
                    recipient, kind, cycle, err
                );
                return;
            }
        };
        if !claimed {
            debug!(
                "notification ({}, {}, {}) already sent, skipping",
                recipient, kind, cycle
            );
            return;
        }

        let sink = self.sink.clone();
        let recipient = recipient.to_string();
        tokio::spawn(async move {
            let result = retry_transient("notification delivery", DELIVERY_ATTEMPTS, || {
                sink.deliver(&recipient, kind, payload.clone())
            })
            .await;
            if let Err(err) = result {
                warn!("notification {} to {} not delivered: {}", kind, recipient, err);
            }
        });
    }
}
