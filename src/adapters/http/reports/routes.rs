//! Axum router configuration for reporting endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{list_invoices, list_virtual_office_invoices, ReportsAppState};

/// Create the reporting router.
///
/// # Routes
/// - `GET /invoices` - Every invoice created in `[from, to]`
/// - `GET /invoices/virtual-office` - Only virtual-office invoices
pub fn report_routes() -> Router<ReportsAppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices/virtual-office", get(list_virtual_office_invoices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use chrono::{DateTime, TimeZone, Utc};
    use tower::ServiceExt;

    use crate::adapters::http::reports::InvoiceReportResponse;
    use crate::adapters::memory::InMemoryBillingStore;
    use crate::domain::billing::{Customer, Invoice, InvoiceCategory, InvoiceStates};
    use crate::domain::foundation::{Country, DateRange, DomainError};
    use crate::ports::{CustomerRepository, InvoiceFilter, InvoiceReportRow, InvoiceRepository};

    fn invoice(id: &str, handle: &str, created: DateTime<Utc>) -> Invoice {
        Invoice {
            id: id.to_string(),
            handle: handle.to_string(),
            customer: "cust-1".to_string(),
            currency: "NOK".to_string(),
            created,
            discount_amount: 0,
            org_amount: 500,
            amount_vat: 100,
            amount_ex_vat: 400,
            refunded_amount: 0,
            authorized_amount: 500,
            country: Country::No,
            plan: None,
            category: InvoiceCategory::from_handle(handle),
            states: InvoiceStates::new(),
        }
    }

    async fn seeded_router() -> Router {
        let store = InMemoryBillingStore::new();
        let mut customer = Customer::new("cust-1");
        customer.email = Some("billing@example.com".to_string());
        CustomerRepository::upsert(&store, &customer).await.unwrap();

        let jan = |d, h| Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap();
        InvoiceRepository::upsert(&store, &invoice("A", "inv-1", jan(10, 8))).await.unwrap();
        InvoiceRepository::upsert(&store, &invoice("B", "ord-1", jan(31, 23))).await.unwrap();
        InvoiceRepository::upsert(&store, &invoice("C", "inv-2", jan(31, 12))).await.unwrap();

        report_routes().with_state(ReportsAppState::new(Arc::new(store)))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn ids(body: &[u8]) -> Vec<String> {
        let rows: Vec<InvoiceReportResponse> = serde_json::from_slice(body).unwrap();
        rows.into_iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn lists_every_invoice_in_range_newest_first() {
        let (status, body) = get(seeded_router().await, "/invoices?from=2024-01-01&to=2024-01-31").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["B", "C", "A"]);
        let rows: Vec<InvoiceReportResponse> = serde_json::from_slice(&body).unwrap();
        assert_eq!(rows[0].customer_email.as_deref(), Some("billing@example.com"));
    }

    #[tokio::test]
    async fn virtual_office_report_filters_by_category() {
        let (status, body) = get(
            seeded_router().await,
            "/invoices/virtual-office?from=2024-01-01&to=2024-01-31",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["C", "A"]);
    }

    #[tokio::test]
    async fn to_day_is_included_and_day_after_is_not() {
        let (_, body) = get(seeded_router().await, "/invoices?from=2024-01-31&to=2024-01-31").await;
        assert_eq!(ids(&body), vec!["B", "C"]);

        let (_, body) = get(seeded_router().await, "/invoices?from=2024-01-11&to=2024-01-30").await;
        assert!(ids(&body).is_empty());
    }

    #[tokio::test]
    async fn reversed_range_is_rejected() {
        let (status, _) = get(seeded_router().await, "/invoices?from=2024-02-01&to=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_or_malformed_dates_are_rejected() {
        for uri in [
            "/invoices",
            "/invoices?from=2024-01-01",
            "/invoices?from=01/01/2024&to=2024-01-31",
            "/invoices/virtual-office?from=2024-01-01&to=2024-13-01",
        ] {
            let (status, _) = get(seeded_router().await, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn post_is_not_allowed() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/invoices?from=2024-01-01&to=2024-01-31")
            .body(Body::empty())
            .unwrap();
        let response = seeded_router().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    struct FailingInvoiceRepository;

    #[async_trait]
    impl InvoiceRepository for FailingInvoiceRepository {
        async fn upsert(&self, _invoice: &Invoice) -> Result<(), DomainError> {
            Ok(())
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<Invoice>, DomainError> {
            Ok(None)
        }

        async fn find_by_created_range(
            &self,
            _range: &DateRange,
            _filter: InvoiceFilter,
        ) -> Result<Vec<InvoiceReportRow>, DomainError> {
            Err(DomainError::database("connection reset"))
        }
    }

    #[tokio::test]
    async fn query_failure_returns_500() {
        let router =
            report_routes().with_state(ReportsAppState::new(Arc::new(FailingInvoiceRepository)));
        let (status, _) = get(router, "/invoices?from=2024-01-01&to=2024-01-31").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
