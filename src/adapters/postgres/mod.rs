//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresCustomerRepository` - Customer upserts keyed by handle
//! - `PostgresInvoiceRepository` - Invoice upserts and date-range reporting
//! - `ensure_schema` - Idempotent table creation at startup

mod customer_repository;
mod invoice_repository;
mod schema;

pub use customer_repository::PostgresCustomerRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use schema::{ensure_schema, SCHEMA_STATEMENTS};
