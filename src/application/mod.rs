//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Webhook deliveries become `SyncJob`s that run either inline or on the
//! worker pool; the backfill walks every listing once at startup.

mod error;
pub mod handlers;
mod sync_worker;

pub use error::SyncError;
pub use handlers::{
    BackfillConfig, BackfillOrchestrator, BackfillReport, CountryTotals, KindTotals,
    QueryInvoicesHandler, QueryInvoicesQuery, QueryInvoicesResult, SyncOutcome,
    SyncResourceCommand, SyncResourceHandler,
};
pub use sync_worker::{
    Dispatched, RetryPolicy, SyncDispatcher, SyncJob, SyncJobProcessor, SyncQueue,
    SyncWorkerConfig, SyncWorkerPool,
};
