//! HTTP adapters - REST API implementations.
//!
//! Each feature has its own sub-router; `router::app_router` mounts them
//! together with the shared middleware.

pub mod middleware;
pub mod reports;
mod router;
pub mod webhook;

pub use middleware::BasicAuthCredentials;
pub use reports::{report_routes, ReportsAppState};
pub use router::app_router;
pub use webhook::{webhook_routes, WebhookAppState, WebhookSecrets};
