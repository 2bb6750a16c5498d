//! HTTP DTOs for reporting endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::InvoiceReportRow;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string of the invoice reports.
///
/// Both bounds are required; they are optional here so that a missing one
/// is reported with the same error body as a malformed one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// One invoice in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceReportResponse {
    pub id: String,
    pub handle: String,
    pub customer: String,
    pub customer_email: Option<String>,
    pub currency: String,
    pub created: DateTime<Utc>,
    pub discount_amount: i64,
    pub org_amount: i64,
    pub amount_vat: i64,
    pub amount_ex_vat: i64,
    pub refunded_amount: i64,
    pub authorized_amount: i64,
    pub country: String,
    pub plan: Option<String>,
    pub category: String,
    pub states: BTreeMap<String, Option<DateTime<Utc>>>,
}

impl From<InvoiceReportRow> for InvoiceReportResponse {
    fn from(row: InvoiceReportRow) -> Self {
        let invoice = row.invoice;
        let states = invoice
            .states
            .iter()
            .map(|(state, at)| (state.to_string(), at))
            .collect();

        Self {
            id: invoice.id,
            handle: invoice.handle,
            customer: invoice.customer,
            customer_email: row.customer_email,
            currency: invoice.currency,
            created: invoice.created,
            discount_amount: invoice.discount_amount,
            org_amount: invoice.org_amount,
            amount_vat: invoice.amount_vat,
            amount_ex_vat: invoice.amount_ex_vat,
            refunded_amount: invoice.refunded_amount,
            authorized_amount: invoice.authorized_amount,
            country: invoice.country.code().to_string(),
            plan: invoice.plan,
            category: invoice.category.as_str().to_string(),
            states,
        }
    }
}

/// Error body of the reporting endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportErrorResponse {
    pub error: String,
}
