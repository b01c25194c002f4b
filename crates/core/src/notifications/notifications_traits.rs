use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::notifications_model::NotificationKind;
use crate::Result;

/// The external delivery channel (email, webhook, ...). Implementations may
/// fail with `Error::TransientIO` to request a retry.
#[async_trait]
pub trait NotificationSinkTrait: Send + Sync {
    async fn deliver(
        &self,
        recipient: &str,
        kind: NotificationKind,
        payload: Value,
    ) -> Result<()>;
}

/// The idempotency log behind notification deduplication.
#[async_trait]
pub trait NotificationLogRepositoryTrait: Send + Sync {
    /// Claims the (recipient, kind, cycle) key. Returns `false` when the key
    /// was already claimed; the claim itself must be atomic.
    async fn try_claim(
        &self,
        recipient: &str,
        kind: NotificationKind,
        cycle: &str,
        now: DateTime<Utc>,
    ) -> Result<bool>;
}
