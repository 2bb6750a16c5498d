//! Sync worker pool - Background processing of webhook deliveries.
//!
//! Webhook handlers enqueue a `SyncJob` and acknowledge at once; a fixed set
//! of workers drains the queue and runs the fetch-and-persist handler.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `workers` | 4 | Concurrent workers pulling from the queue |
//! | `queue_capacity` | 1024 | Jobs held before enqueue reports full |
//! | `max_attempts` | 5 | Tries per job, first one included |
//! | `initial_backoff` | 500ms | Delay before the first retry, doubled per retry |
//!
//! ## Shutdown
//!
//! Workers exit once every `SyncQueue` clone has been dropped and the queue
//! is drained.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::billing::SyncTarget;
use crate::domain::foundation::Country;

use super::handlers::{SyncOutcome, SyncResourceCommand, SyncResourceHandler};
use super::SyncError;

/// Upper bound on a single retry delay.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// One webhook delivery waiting to be synced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncJob {
    pub country: Country,
    pub target: SyncTarget,
    /// Correlates log lines of one delivery across retries.
    pub delivery_id: Uuid,
}

impl SyncJob {
    pub fn new(country: Country, target: SyncTarget) -> Self {
        Self {
            country,
            target,
            delivery_id: Uuid::new_v4(),
        }
    }

    fn command(&self) -> SyncResourceCommand {
        SyncResourceCommand {
            country: self.country,
            target: self.target.clone(),
        }
    }
}

/// Exponential backoff for retryable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}

/// Configuration for the worker pool.
#[derive(Debug, Clone)]
pub struct SyncWorkerConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    pub retry: RetryPolicy,
}

impl Default for SyncWorkerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 1024,
            retry: RetryPolicy::default(),
        }
    }
}

impl SyncWorkerConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Sending side of the sync queue.
#[derive(Clone)]
pub struct SyncQueue {
    sender: mpsc::Sender<SyncJob>,
}

impl SyncQueue {
    /// Enqueue without waiting.
    ///
    /// # Errors
    ///
    /// - `QueueFull` when every slot is taken
    /// - `QueueClosed` when the workers are gone
    pub fn try_enqueue(&self, job: SyncJob) -> Result<(), SyncError> {
        self.sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(job) => {
                tracing::warn!(delivery_id = %job.delivery_id, "Sync queue full, rejecting delivery");
                SyncError::QueueFull
            }
            TrySendError::Closed(_) => SyncError::QueueClosed,
        })
    }
}

/// Runs one job to completion, retrying transient failures.
pub struct SyncJobProcessor {
    handler: Arc<SyncResourceHandler>,
    retry: RetryPolicy,
}

impl SyncJobProcessor {
    pub fn new(handler: Arc<SyncResourceHandler>, retry: RetryPolicy) -> Self {
        Self { handler, retry }
    }

    pub async fn process(&self, job: &SyncJob) -> Result<SyncOutcome, SyncError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.handler.handle(job.command()).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(
                        delivery_id = %job.delivery_id,
                        country = %job.country,
                        target = %job.target,
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "Sync failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        delivery_id = %job.delivery_id,
                        country = %job.country,
                        target = %job.target,
                        attempt,
                        error = %e,
                        "Sync failed, dropping delivery"
                    );
                    return Err(e);
                }
            }
        }
    }
}

/// Handles to the running workers.
pub struct SyncWorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl SyncWorkerPool {
    /// Spawn the workers and return the queue that feeds them.
    pub fn start(handler: Arc<SyncResourceHandler>, config: SyncWorkerConfig) -> (SyncQueue, Self) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let processor = Arc::new(SyncJobProcessor::new(handler, config.retry));

        let handles = (0..config.workers.max(1))
            .map(|worker| {
                let receiver = Arc::clone(&receiver);
                let processor = Arc::clone(&processor);
                tokio::spawn(run_worker(worker, receiver, processor))
            })
            .collect();

        tracing::info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "Sync workers started"
        );
        (SyncQueue { sender }, Self { handles })
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Sync worker panicked");
            }
        }
    }
}

async fn run_worker(
    worker: usize,
    receiver: Arc<Mutex<mpsc::Receiver<SyncJob>>>,
    processor: Arc<SyncJobProcessor>,
) {
    loop {
        let job = { receiver.lock().await.recv().await };
        let Some(job) = job else {
            break;
        };
        // Outcome already logged by the processor.
        let _ = processor.process(&job).await;
    }
    tracing::debug!(worker, "Sync worker stopped");
}

/// How a webhook delivery is turned into a sync.
#[derive(Clone)]
pub enum SyncDispatcher {
    /// Fetch and persist inside the request.
    Inline(Arc<SyncResourceHandler>),
    /// Hand the job to the worker pool.
    Queued(SyncQueue),
}

/// What happened to a dispatched job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Completed(SyncOutcome),
    Enqueued,
}

impl SyncDispatcher {
    pub async fn dispatch(&self, job: SyncJob) -> Result<Dispatched, SyncError> {
        match self {
            SyncDispatcher::Inline(handler) => {
                let outcome = handler.handle(job.command()).await?;
                Ok(Dispatched::Completed(outcome))
            }
            SyncDispatcher::Queued(queue) => {
                queue.try_enqueue(job)?;
                Ok(Dispatched::Enqueued)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::frisbii::MockBillingProvider;
    use crate::adapters::memory::InMemoryBillingStore;
    use crate::domain::billing::Customer;
    use crate::ports::{CustomerRepository, ProviderError};

    fn handler(provider: &MockBillingProvider, store: &InMemoryBillingStore) -> Arc<SyncResourceHandler> {
        Arc::new(SyncResourceHandler::new(
            Arc::new(provider.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        ))
    }

    fn customer_job(handle: &str) -> SyncJob {
        SyncJob::new(Country::Dk, SyncTarget::Customer(handle.to_string()))
    }

    fn fast_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(10),
        }
    }

    #[test]
    fn backoff_doubles_and_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(4), Duration::from_millis(800));
        assert_eq!(policy.backoff(40), MAX_BACKOFF);
    }

    #[test]
    fn each_job_gets_its_own_delivery_id() {
        assert_ne!(customer_job("a").delivery_id, customer_job("a").delivery_id);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_until_success() {
        let provider = MockBillingProvider::new();
        let store = InMemoryBillingStore::new();
        provider.add_customer(Country::Dk, Customer::new("c1"));
        provider.fail_times("fetch_customer", 2, ProviderError::Network("reset".into()));

        let processor = SyncJobProcessor::new(handler(&provider, &store), fast_retry(5));
        let outcome = processor.process(&customer_job("c1")).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Upserted);
        assert_eq!(provider.call_count("fetch_customer"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_stop_at_max_attempts() {
        let provider = MockBillingProvider::new();
        let store = InMemoryBillingStore::new();
        provider.set_method_error(
            "fetch_customer",
            ProviderError::UnexpectedStatus {
                status: 503,
                body: String::new(),
            },
        );

        let processor = SyncJobProcessor::new(handler(&provider, &store), fast_retry(3));
        assert!(processor.process(&customer_job("c1")).await.is_err());
        assert_eq!(provider.call_count("fetch_customer"), 3);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let provider = MockBillingProvider::new();
        let store = InMemoryBillingStore::new();
        provider.set_method_error("fetch_customer", ProviderError::Decode("bad".into()));

        let processor = SyncJobProcessor::new(handler(&provider, &store), fast_retry(5));
        assert!(processor.process(&customer_job("c1")).await.is_err());
        assert_eq!(provider.call_count("fetch_customer"), 1);
    }

    #[tokio::test]
    async fn full_queue_rejects_delivery() {
        let (sender, _receiver) = mpsc::channel(1);
        let queue = SyncQueue { sender };

        assert!(queue.try_enqueue(customer_job("a")).is_ok());
        assert!(matches!(
            queue.try_enqueue(customer_job("b")),
            Err(SyncError::QueueFull)
        ));
    }

    #[tokio::test]
    async fn closed_queue_rejects_delivery() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let queue = SyncQueue { sender };
        assert!(matches!(
            queue.try_enqueue(customer_job("a")),
            Err(SyncError::QueueClosed)
        ));
    }

    #[tokio::test]
    async fn workers_drain_queue_and_stop_when_senders_drop() {
        let provider = MockBillingProvider::new();
        let store = InMemoryBillingStore::new();
        for handle in ["a", "b", "c"] {
            provider.add_customer(Country::Dk, Customer::new(handle));
        }

        let config = SyncWorkerConfig::default().with_workers(2).with_queue_capacity(8);
        let (queue, pool) = SyncWorkerPool::start(handler(&provider, &store), config);
        assert_eq!(pool.worker_count(), 2);

        for handle in ["a", "b", "c"] {
            queue.try_enqueue(customer_job(handle)).unwrap();
        }
        drop(queue);
        pool.join().await;

        assert_eq!(store.customer_count().await, 3);
        assert!(store.find_by_handle("b").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn inline_dispatch_completes_within_call() {
        let provider = MockBillingProvider::new();
        let store = InMemoryBillingStore::new();
        provider.add_customer(Country::Dk, Customer::new("c1"));

        let dispatcher = SyncDispatcher::Inline(handler(&provider, &store));
        let result = dispatcher.dispatch(customer_job("c1")).await.unwrap();

        assert_eq!(result, Dispatched::Completed(SyncOutcome::Upserted));
        assert_eq!(store.customer_count().await, 1);
    }

    #[tokio::test]
    async fn inline_dispatch_surfaces_failures() {
        let provider = MockBillingProvider::new();
        let store = InMemoryBillingStore::new();
        provider.set_method_error("fetch_customer", ProviderError::Network("reset".into()));

        let dispatcher = SyncDispatcher::Inline(handler(&provider, &store));
        assert!(dispatcher.dispatch(customer_job("c1")).await.is_err());
        assert_eq!(provider.call_count("fetch_customer"), 1);
    }
}
