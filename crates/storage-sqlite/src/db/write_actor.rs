use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use fairshare_core::errors::Result;
use std::any::Any;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

// A write job: runs against the actor's dedicated connection inside an
// immediate transaction. Return values are type-erased through Any so one
// channel serves every job shape.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

/// Handle for sending jobs to the writer actor.
///
/// Every mutation in this crate goes through a handle, which is what makes
/// a settlement run a single transaction and serializes relationship
/// open/close writes on top of their unique indexes.
#[derive(Clone)]
pub struct WriteHandle {
    #[allow(clippy::type_complexity)]
    tx: mpsc::Sender<(
        Job<Box<dyn Any + Send + 'static>>,
        oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>,
    )>,
}

impl WriteHandle {
    /// Runs a job on the writer's connection and returns its result. The
    /// job executes inside an immediate transaction: if it errors, every
    /// statement it issued is rolled back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .expect("writer actor stopped; its receiving channel is closed");

        ret_rx
            .await
            .expect("writer actor dropped the reply sender without a result")
            .map(|boxed: Box<dyn Any + Send + 'static>| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("failed to downcast writer actor result"))
            })
    }
}

/// Spawns the single-writer actor. It owns one connection from the pool and
/// processes write jobs serially, each in an immediate transaction.
pub fn spawn_writer(pool: Arc<DbPool>) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(
        Job<Box<dyn Any + Send + 'static>>,
        oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>,
    )>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("failed to acquire the writer actor's dedicated connection");

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(|e: StorageError| e.into());

            // the receiver may have been dropped; nothing to do then
            let _ = reply_tx.send(result);
        }
        // channel closed: all handles dropped, the actor terminates
    });

    WriteHandle { tx }
}
