//! # Bounded Worker Pool
//!
//! Fans a batch of work items out to at most `limit` concurrent tasks and funnels
//! every result back through a single consumer.
//!
//! * **Admission**: a [`Semaphore`] with `limit` permits. The dispatcher blocks on
//!   it, so no more than `limit` items are ever in flight.
//! * **Reconciliation**: results travel over one [`mpsc`] channel and are handed
//!   to the `reconcile` closure on the calling task, one at a time. That closure is
//!   the only place shared state may be written.
//! * **Barrier**: [`WorkerPool::run`] returns once the channel is drained and every
//!   sender (dispatcher and workers) is gone. The [`PoolReport`] compares the
//!   dispatched and reconciled counts.
//!
//! A worker permit is held until its result has been queued, so a slow consumer
//! throttles the dispatcher instead of piling up results.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    limit: usize,
}

/// Counts gathered by the barrier at the end of [`WorkerPool::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub dispatched: usize,
    pub reconciled: usize,
}

impl PoolReport {
    pub fn is_complete(&self) -> bool {
        self.dispatched == self.reconciled
    }
}

impl WorkerPool {
    /// Upper bound on in-flight items and queued results.
    pub const MAX_LIMIT: usize = 1 << 16;

    /// `limit` is clamped to `1..=MAX_LIMIT`.
    pub fn new(limit: usize) -> Self {
        let clamped: usize = limit.clamp(1, Self::MAX_LIMIT);
        if clamped != limit {
            warn!("Worker limit {limit} clamped to {clamped}");
        }
        Self { limit: clamped }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `worker` over every item and feeds each result to `reconcile`.
    ///
    /// Workers cannot fail the pool: whatever they return, errors included, is
    /// reconciled like any other value. A worker that panics loses its result,
    /// which shows up as an incomplete [`PoolReport`].
    pub async fn run<T, R, W, Fut, C>(&self, items: Vec<T>, worker: W, mut reconcile: C) -> PoolReport
    where
        T: Send + 'static,
        R: Send + 'static,
        W: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        C: FnMut(R),
    {
        let gate: Arc<Semaphore> = Arc::new(Semaphore::new(self.limit));
        let (tx, mut rx) = mpsc::channel::<R>(self.limit);
        let worker: Arc<W> = Arc::new(worker);
        let total: usize = items.len();

        let dispatcher = tokio::spawn(async move {
            let mut dispatched: usize = 0;
            for item in items {
                let permit = match Arc::clone(&gate).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("Worker gate closed after {dispatched} items: {e}");
                        break;
                    }
                };

                let worker = Arc::clone(&worker);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    let result = (*worker)(item).await;
                    if tx.send(result).await.is_err() {
                        warn!("Result dropped, reconciliation already stopped");
                    }
                });
                dispatched += 1;
            }
            dispatched
        });

        let mut reconciled: usize = 0;
        while let Some(result) = rx.recv().await {
            reconcile(result);
            reconciled += 1;
        }

        let dispatched: usize = match dispatcher.await {
            Ok(dispatched) => dispatched,
            Err(e) => {
                error!("Dispatcher failed: {e}");
                total
            }
        };

        let report = PoolReport {
            dispatched,
            reconciled,
        };
        if report.is_complete() {
            debug!("Pool drained {reconciled} results with {} workers", self.limit);
        } else {
            warn!("Only {reconciled} of {dispatched} results were reconciled");
        }
        report
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
