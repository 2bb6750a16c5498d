//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `frisbii` - Provider REST client, wire mapping and webhook signatures
//! - `postgres` - Customer and invoice persistence
//! - `memory` - In-memory store for tests and local runs
//! - `http` - Webhook, reporting and health endpoints

pub mod frisbii;
pub mod http;
pub mod memory;
pub mod postgres;

pub use frisbii::{FrisbiiClient, FrisbiiConfig, ProviderCredentials};
pub use memory::InMemoryBillingStore;
pub use postgres::{ensure_schema, PostgresCustomerRepository, PostgresInvoiceRepository};
