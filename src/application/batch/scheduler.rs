use super::config::SchedulerConfig;
use super::dto::{
    BatchCallback, BatchId, CheckOutcome, PendingBatchRequest, StatusCheckResult, StatusRequest,
};
use crate::domain::interaction::{InteractionError, RemoteInteractionService};
use crate::infrastructure::monitoring::metrics::SyncMetrics;
use futures_util::FutureExt;
use futures_util::future::join_all;
use std::collections::{HashMap, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Coalesces status reads from many controllers into bounded, throttled
/// windows against the remote service.
///
/// One instance is shared by every controller that needs an initial read.
/// `enqueue` must be called from inside a Tokio runtime.
#[derive(Clone)]
pub struct BatchRequestScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    service: Arc<dyn RemoteInteractionService>,
    config: SchedulerConfig,
    metrics: Option<Arc<SyncMetrics>>,
    queue: Mutex<QueueState>,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<PendingBatchRequest>,
    batches: HashMap<BatchId, BatchEntry>,
    draining: bool,
}

struct BatchEntry {
    callback: BatchCallback,
    results: Vec<Option<StatusCheckResult>>,
    remaining: usize,
}

impl BatchRequestScheduler {
    pub fn new(service: Arc<dyn RemoteInteractionService>, config: SchedulerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                config,
                metrics: None,
                queue: Mutex::new(QueueState::default()),
            }),
        }
    }

    pub fn with_metrics(
        service: Arc<dyn RemoteInteractionService>,
        config: SchedulerConfig,
        metrics: Arc<SyncMetrics>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                config,
                metrics: Some(metrics),
                queue: Mutex::new(QueueState::default()),
            }),
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.inner.config
    }

    /// Requests still waiting for a window.
    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    pub fn is_draining(&self) -> bool {
        self.inner.lock().draining
    }

    /// Queues `requests` as one batch. `callback` fires once with all of
    /// their results, in request order, after the last one settles.
    pub fn enqueue<F>(&self, requests: Vec<StatusRequest>, callback: F) -> BatchId
    where
        F: FnOnce(Vec<StatusCheckResult>) + Send + 'static,
    {
        let batch_id = Uuid::now_v7();
        if requests.is_empty() {
            callback(Vec::new());
            return batch_id;
        }

        let count = requests.len();
        let start_drain = {
            let mut queue = self.inner.lock();
            queue.batches.insert(
                batch_id,
                BatchEntry {
                    callback: Box::new(callback),
                    results: vec![None; count],
                    remaining: count,
                },
            );
            queue
                .pending
                .extend(
                    requests
                        .into_iter()
                        .enumerate()
                        .map(|(position, request)| PendingBatchRequest {
                            request,
                            batch_id,
                            position,
                        }),
                );
            !std::mem::replace(&mut queue.draining, true)
        };
        debug!(batch_id = %batch_id, requests = count, "batch enqueued");

        if start_drain {
            let inner = self.inner.clone();
            tokio::spawn(inner.drain());
        }
        batch_id
    }

    /// Queues `requests` as one batch and waits for its results.
    pub async fn check(&self, requests: Vec<StatusRequest>) -> Vec<StatusCheckResult> {
        let (tx, rx) = oneshot::channel();
        self.enqueue(requests, move |results| {
            let _ = tx.send(results);
        });
        rx.await.unwrap_or_default()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn drain(self: Arc<Self>) {
        let mut first_window = true;
        loop {
            {
                let mut queue = self.lock();
                if queue.pending.is_empty() {
                    queue.draining = false;
                    return;
                }
            }
            // Only the drain task removes from the queue, so it is still
            // non-empty after the pause.
            if !first_window {
                tokio::time::sleep(self.config.batch_delay).await;
            }
            first_window = false;

            let window: Vec<PendingBatchRequest> = {
                let mut queue = self.lock();
                let take = self.config.batch_size.max(1).min(queue.pending.len());
                queue.pending.drain(..take).collect()
            };
            debug!(window = window.len(), "dispatching batch window");
            if let Some(metrics) = &self.metrics {
                metrics.record_batch_window(window.len());
            }

            let settled = join_all(window.into_iter().map(|pending| self.dispatch(pending))).await;

            let ready = {
                let mut queue = self.lock();
                let mut ready = Vec::new();
                for (batch_id, position, result) in settled {
                    let Some(entry) = queue.batches.get_mut(&batch_id) else {
                        continue;
                    };
                    entry.results[position] = Some(result);
                    entry.remaining -= 1;
                    if entry.remaining == 0 {
                        if let Some(entry) = queue.batches.remove(&batch_id) {
                            ready.push((batch_id, entry));
                        }
                    }
                }
                ready
            };

            for (batch_id, entry) in ready {
                let results: Vec<StatusCheckResult> = entry.results.into_iter().flatten().collect();
                debug!(batch_id = %batch_id, results = results.len(), "batch resolved");
                let callback = entry.callback;
                if std::panic::catch_unwind(AssertUnwindSafe(move || callback(results))).is_err() {
                    error!(batch_id = %batch_id, "batch callback panicked");
                }
            }
        }
    }

    /// Runs one read, turning a panic in the service into a degraded result
    /// so the batch still settles.
    async fn dispatch(&self, pending: PendingBatchRequest) -> (BatchId, usize, StatusCheckResult) {
        let batch_id = pending.batch_id;
        let position = pending.position;
        let subject_id = pending.request.subject_id.clone();
        let check = pending.request.check;

        match AssertUnwindSafe(self.execute(pending)).catch_unwind().await {
            Ok(settled) => settled,
            Err(_) => {
                error!(subject_id = %subject_id, check = ?check, "status check panicked");
                if let Some(metrics) = &self.metrics {
                    metrics.record_degraded_read();
                }
                (
                    batch_id,
                    position,
                    StatusCheckResult {
                        subject_id,
                        check,
                        outcome: CheckOutcome::degraded(InteractionError::Degraded(
                            "status check panicked".to_string(),
                        )),
                    },
                )
            }
        }
    }

    /// Runs one read; failures become a degraded default instead of an error.
    async fn execute(&self, pending: PendingBatchRequest) -> (BatchId, usize, StatusCheckResult) {
        let PendingBatchRequest {
            request,
            batch_id,
            position,
        } = pending;
        let outcome = match request
            .check
            .run(
                self.service.as_ref(),
                &request.subject_id,
                request.user_id.as_deref(),
            )
            .await
        {
            Ok(status) => CheckOutcome::Resolved(status),
            Err(err) => {
                warn!(
                    subject_id = %request.subject_id,
                    check = ?request.check,
                    error = %err,
                    "status check failed, using safe default"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_degraded_read();
                }
                CheckOutcome::degraded(err)
            }
        };
        (
            batch_id,
            position,
            StatusCheckResult {
                subject_id: request.subject_id,
                check: request.check,
                outcome,
            },
        )
    }
}
