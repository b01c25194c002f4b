use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use fairshare_core::notifications::{NotificationKind, NotificationLogRepositoryTrait};
use fairshare_core::Result;

use super::model::NotificationDB;
use crate::db::{DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::notifications;

pub struct NotificationLogRepository {
    #[allow(dead_code)]
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl NotificationLogRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl NotificationLogRepositoryTrait for NotificationLogRepository {
    async fn try_claim(
        &self,
        claim_recipient: &str,
        claim_kind: NotificationKind,
        claim_cycle: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let claim_recipient = claim_recipient.to_string();
        let claim_cycle = claim_cycle.to_string();
        self.writer
            .exec(move |conn| -> Result<bool> {
                let row = NotificationDB {
                    id: Uuid::new_v4().to_string(),
                    recipient: claim_recipient,
                    kind: claim_kind.as_str().to_string(),
                    cycle: claim_cycle,
                    created_at: now.naive_utc(),
                };
                // a duplicate key means the notification already went out;
                // that is a skip, not an error
                let result = diesel::insert_into(notifications::table)
                    .values(&row)
                    .execute(conn);
                match result {
                    Ok(_) => Ok(true),
                    Err(err) => {
                        let core_err: fairshare_core::Error = StorageError::from(err).into();
                        if core_err.is_unique_violation() {
                            Ok(false)
                        } else {
                            Err(core_err)
                        }
                    }
                }
            })
            .await
    }
}
