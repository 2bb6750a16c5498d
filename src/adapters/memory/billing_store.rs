//! In-Memory Billing Store
//!
//! Holds mirrored customers and invoices in memory and answers reporting
//! queries the same way the PostgreSQL adapter does.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::billing::{Customer, Invoice};
use crate::domain::foundation::{DateRange, DomainError};
use crate::ports::{CustomerRepository, InvoiceFilter, InvoiceReportRow, InvoiceRepository};

/// In-memory storage for customers and invoices.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBillingStore {
    customers: Arc<RwLock<HashMap<String, Customer>>>,
    invoices: Arc<RwLock<HashMap<String, Invoice>>>,
    /// Keys whose upserts fail, for exercising error paths.
    failing_keys: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryBillingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make upserts of the customer handle or invoice ID `key` fail.
    pub async fn fail_upserts_for(&self, key: impl Into<String>) {
        self.failing_keys.write().await.insert(key.into());
    }

    pub async fn customer_count(&self) -> usize {
        self.customers.read().await.len()
    }

    pub async fn invoice_count(&self) -> usize {
        self.invoices.read().await.len()
    }

    async fn check_failure(&self, key: &str) -> Result<(), DomainError> {
        if self.failing_keys.read().await.contains(key) {
            return Err(DomainError::database("simulated write failure").with_detail("key", key));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryBillingStore {
    async fn upsert(&self, customer: &Customer) -> Result<(), DomainError> {
        self.check_failure(&customer.handle).await?;
        self.customers
            .write()
            .await
            .insert(customer.handle.clone(), customer.clone());
        Ok(())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Customer>, DomainError> {
        Ok(self.customers.read().await.get(handle).cloned())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryBillingStore {
    async fn upsert(&self, invoice: &Invoice) -> Result<(), DomainError> {
        self.check_failure(&invoice.id).await?;
        self.invoices
            .write()
            .await
            .insert(invoice.id.clone(), invoice.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.read().await.get(id).cloned())
    }

    async fn find_by_created_range(
        &self,
        range: &DateRange,
        filter: InvoiceFilter,
    ) -> Result<Vec<InvoiceReportRow>, DomainError> {
        let invoices = self.invoices.read().await;
        let customers = self.customers.read().await;

        let mut rows: Vec<InvoiceReportRow> = invoices
            .values()
            .filter(|i| range.contains(&i.created) && filter.matches(i))
            .map(|i| InvoiceReportRow {
                invoice: i.clone(),
                customer_email: customers.get(&i.customer).and_then(|c| c.email.clone()),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.invoice
                .created
                .cmp(&a.invoice.created)
                .then_with(|| a.invoice.id.cmp(&b.invoice.id))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{InvoiceCategory, InvoiceStates};
    use crate::domain::foundation::Country;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn invoice(id: &str, handle: &str, customer: &str, created: DateTime<Utc>) -> Invoice {
        Invoice {
            id: id.to_string(),
            handle: handle.to_string(),
            customer: customer.to_string(),
            currency: "DKK".to_string(),
            created,
            discount_amount: 0,
            org_amount: 1000,
            amount_vat: 200,
            amount_ex_vat: 800,
            refunded_amount: 0,
            authorized_amount: 0,
            country: Country::Dk,
            plan: None,
            category: InvoiceCategory::from_handle(handle),
            states: InvoiceStates::new(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_the_whole_customer() {
        let store = InMemoryBillingStore::new();
        let mut first = Customer::new("c1");
        first.email = Some("old@example.com".to_string());
        first.phone = Some("123".to_string());
        CustomerRepository::upsert(&store, &first).await.unwrap();

        let mut second = Customer::new("c1");
        second.email = Some("new@example.com".to_string());
        CustomerRepository::upsert(&store, &second).await.unwrap();

        assert_eq!(store.customer_count().await, 1);
        let stored = store.find_by_handle("c1").await.unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn range_is_inclusive_of_the_to_day_and_newest_first() {
        let store = InMemoryBillingStore::new();
        let mut c = Customer::new("c1");
        c.email = Some("c1@example.com".to_string());
        CustomerRepository::upsert(&store, &c).await.unwrap();

        for inv in [
            invoice("a", "inv-1", "c1", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            invoice("b", "inv-2", "c2", Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 59).unwrap()),
            invoice("c", "inv-3", "c1", Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()),
        ] {
            InvoiceRepository::upsert(&store, &inv).await.unwrap();
        }

        let range = DateRange::from_days(day(1), day(2)).unwrap();
        let rows = store
            .find_by_created_range(&range, InvoiceFilter::All)
            .await
            .unwrap();

        let ids: Vec<_> = rows.iter().map(|r| r.invoice.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(rows[0].customer_email, None);
        assert_eq!(rows[1].customer_email.as_deref(), Some("c1@example.com"));
    }

    #[tokio::test]
    async fn category_filter_limits_rows() {
        let store = InMemoryBillingStore::new();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        InvoiceRepository::upsert(&store, &invoice("a", "inv-1", "c1", at)).await.unwrap();
        InvoiceRepository::upsert(&store, &invoice("b", "sub-1", "c1", at)).await.unwrap();

        let range = DateRange::from_days(day(1), day(1)).unwrap();
        let rows = store
            .find_by_created_range(
                &range,
                InvoiceFilter::Category(InvoiceCategory::VirtualOffice),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].invoice.id, "a");
    }

    #[tokio::test]
    async fn injected_failures_surface_as_database_errors() {
        let store = InMemoryBillingStore::new();
        store.fail_upserts_for("c1").await;
        let err = CustomerRepository::upsert(&store, &Customer::new("c1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::domain::foundation::ErrorCode::DatabaseError);
    }
}
