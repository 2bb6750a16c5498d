//! QueryInvoicesHandler - Query handler for invoice reports.

use std::sync::Arc;

use crate::domain::foundation::{DateRange, DomainError};
use crate::ports::{InvoiceFilter, InvoiceReportRow, InvoiceRepository};

/// Query for invoices created within a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryInvoicesQuery {
    pub range: DateRange,
    pub filter: InvoiceFilter,
}

pub type QueryInvoicesResult = Vec<InvoiceReportRow>;

/// Handler for invoice report queries.
pub struct QueryInvoicesHandler {
    invoices: Arc<dyn InvoiceRepository>,
}

impl QueryInvoicesHandler {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }

    pub async fn handle(&self, query: QueryInvoicesQuery) -> Result<QueryInvoicesResult, DomainError> {
        let rows = self
            .invoices
            .find_by_created_range(&query.range, query.filter)
            .await?;

        tracing::debug!(
            from = %query.range.from(),
            to = %query.range.to(),
            filter = ?query.filter,
            rows = rows.len(),
            "Invoice report queried"
        );
        Ok(rows)
    }
}
