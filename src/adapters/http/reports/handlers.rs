//! HTTP handlers for reporting endpoints.
//!
//! These handlers connect Axum routes to the invoice query handler.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::application::{QueryInvoicesHandler, QueryInvoicesQuery};
use crate::domain::billing::InvoiceCategory;
use crate::domain::foundation::{DateRange, DomainError, ValidationError};
use crate::ports::{InvoiceFilter, InvoiceRepository};

use super::dto::{InvoiceReportResponse, ReportErrorResponse, ReportQueryParams};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ReportsAppState {
    pub invoices: Arc<dyn InvoiceRepository>,
}

impl ReportsAppState {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }

    pub fn query_invoices_handler(&self) -> QueryInvoicesHandler {
        QueryInvoicesHandler::new(self.invoices.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    InvalidRange(#[from] ValidationError),

    #[error("Failed to query invoices")]
    Query(#[from] DomainError),
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReportError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            ReportError::Query(e) => {
                tracing::error!(error = %e, "Invoice report query failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ReportErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /invoices - All invoices created in the date range.
pub async fn list_invoices(
    State(state): State<ReportsAppState>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<Vec<InvoiceReportResponse>>, ReportError> {
    run_report(&state, &params, InvoiceFilter::All).await
}

/// GET /invoices/virtual-office - Virtual-office invoices created in the date range.
pub async fn list_virtual_office_invoices(
    State(state): State<ReportsAppState>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<Vec<InvoiceReportResponse>>, ReportError> {
    run_report(
        &state,
        &params,
        InvoiceFilter::Category(InvoiceCategory::VirtualOffice),
    )
    .await
}

async fn run_report(
    state: &ReportsAppState,
    params: &ReportQueryParams,
    filter: InvoiceFilter,
) -> Result<Json<Vec<InvoiceReportResponse>>, ReportError> {
    let range = DateRange::parse_days(
        params.from.as_deref().unwrap_or_default(),
        params.to.as_deref().unwrap_or_default(),
    )?;

    let rows = state
        .query_invoices_handler()
        .handle(QueryInvoicesQuery { range, filter })
        .await?;

    Ok(Json(rows.into_iter().map(InvoiceReportResponse::from).collect()))
}
