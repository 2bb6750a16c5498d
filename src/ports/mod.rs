//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Provider Port
//!
//! - `BillingProvider` - Reads customers and invoices from the PSP
//!
//! ## Persistence Ports
//!
//! - `CustomerRepository` - Customer upserts keyed by handle
//! - `InvoiceRepository` - Invoice upserts keyed by ID, date-range reporting

mod billing_provider;
mod customer_repository;
mod invoice_repository;

pub use billing_provider::{BillingProvider, Page, ProviderError};
pub use customer_repository::CustomerRepository;
pub use invoice_repository::{InvoiceFilter, InvoiceReportRow, InvoiceRepository};
