use std::future::Future;
use std::time::Duration;

use log::warn;

use crate::errors::{Error, Result};

/// Retries an async operation on `Error::TransientIO`, with exponential
/// backoff starting at 100ms.
///
/// Only reads and notification delivery go through this helper. Settlement
/// writes are never retried here: a write that failed mid-flight is
/// ambiguous, and re-running it must go through the uniqueness constraint
/// instead.
pub async fn retry_transient<F, Fut, T>(op_name: &str, max_attempts: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = Duration::from_millis(100);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(Error::TransientIO(reason)) if attempt < max_attempts => {
                warn!(
                    "{} failed transiently (attempt {}/{}): {}",
                    op_name, attempt, max_attempts, reason
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            other => return other,
        }
    }
}
