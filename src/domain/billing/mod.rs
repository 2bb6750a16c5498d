//! Billing module - customers and invoices mirrored from the provider.
//!
//! Records here are never mutated locally. They are created or replaced
//! wholesale from provider data, keyed by the provider's own identifiers.

mod customer;
mod event;
mod invoice;

pub use customer::Customer;
pub use event::{ResourceKind, SyncTarget, WebhookEventKind};
pub use invoice::{Invoice, InvoiceCategory, InvoiceStates};
