//! HTTP adapter for invoice reports.
//!
//! Both endpoints take `from` and `to` as `YYYY-MM-DD` and sit behind HTTP
//! basic auth, applied where the router is assembled.

pub mod dto;
mod handlers;
mod routes;

pub use dto::{InvoiceReportResponse, ReportQueryParams};
pub use handlers::{list_invoices, list_virtual_office_invoices, ReportError, ReportsAppState};
pub use routes::report_routes;
