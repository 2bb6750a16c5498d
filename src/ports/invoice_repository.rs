//! Invoice repository port.
//!
//! Invoices are keyed by their provider ID. Writes are upserts that replace
//! the whole record, state map included.

use async_trait::async_trait;

use crate::domain::billing::{Invoice, InvoiceCategory};
use crate::domain::foundation::{DateRange, DomainError};

/// Repository port for invoice persistence and reporting reads.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert the invoice, or overwrite every non-key field of the existing
    /// row with the same ID.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, invoice: &Invoice) -> Result<(), DomainError>;

    /// Find an invoice by ID.
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, DomainError>;

    /// Invoices created within `[range.from, range.to)`, newest first.
    ///
    /// Each row carries the owning customer's email when that customer has
    /// been synced.
    async fn find_by_created_range(
        &self,
        range: &DateRange,
        filter: InvoiceFilter,
    ) -> Result<Vec<InvoiceReportRow>, DomainError>;
}

/// Restriction applied to a reporting query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvoiceFilter {
    #[default]
    All,
    Category(InvoiceCategory),
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        match self {
            InvoiceFilter::All => true,
            InvoiceFilter::Category(category) => invoice.category == *category,
        }
    }
}

/// An invoice joined with its customer's contact email.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceReportRow {
    pub invoice: Invoice,
    pub customer_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn InvoiceRepository) {}
    }
}
