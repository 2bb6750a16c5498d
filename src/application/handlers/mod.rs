//! Application handlers.
//!
//! ## Commands
//! - Sync a single customer or invoice from the provider
//! - Backfill every provider account
//!
//! ## Queries
//! - Invoice reports by creation date

mod backfill;
mod query_invoices;
mod sync_resource;

// Commands
pub use backfill::{
    BackfillConfig, BackfillOrchestrator, BackfillReport, CountryTotals, KindTotals,
    MIN_PAGE_DELAY,
};
pub use sync_resource::{SyncOutcome, SyncResourceCommand, SyncResourceHandler};

// Queries
pub use query_invoices::{QueryInvoicesHandler, QueryInvoicesQuery, QueryInvoicesResult};
