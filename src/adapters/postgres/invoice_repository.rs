//! PostgreSQL implementation of InvoiceRepository.
//!
//! The state map is stored as JSONB and replaced wholesale on every upsert.
//! Reporting reads join the owning customer for its email.

use crate::domain::billing::{Invoice, InvoiceCategory, InvoiceStates};
use crate::domain::foundation::{Country, DateRange, DomainError};
use crate::ports::{InvoiceFilter, InvoiceReportRow, InvoiceRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

/// PostgreSQL implementation of the InvoiceRepository port.
pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const UPSERT_INVOICE: &str = r#"
    INSERT INTO invoices (
        id, handle, customer, currency, created, discount_amount, org_amount,
        amount_vat, amount_ex_vat, refunded_amount, authorized_amount, country,
        plan, category, states
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
    ON CONFLICT (id) DO UPDATE SET
        handle = EXCLUDED.handle,
        customer = EXCLUDED.customer,
        currency = EXCLUDED.currency,
        created = EXCLUDED.created,
        discount_amount = EXCLUDED.discount_amount,
        org_amount = EXCLUDED.org_amount,
        amount_vat = EXCLUDED.amount_vat,
        amount_ex_vat = EXCLUDED.amount_ex_vat,
        refunded_amount = EXCLUDED.refunded_amount,
        authorized_amount = EXCLUDED.authorized_amount,
        country = EXCLUDED.country,
        plan = EXCLUDED.plan,
        category = EXCLUDED.category,
        states = EXCLUDED.states
"#;

const SELECT_INVOICE_BY_ID: &str = r#"
    SELECT i.id, i.handle, i.customer, i.currency, i.created, i.discount_amount,
           i.org_amount, i.amount_vat, i.amount_ex_vat, i.refunded_amount,
           i.authorized_amount, i.country, i.plan, i.category, i.states,
           NULL::TEXT AS customer_email
    FROM invoices i
    WHERE i.id = $1
"#;

const SELECT_INVOICES_IN_RANGE: &str = r#"
    SELECT i.id, i.handle, i.customer, i.currency, i.created, i.discount_amount,
           i.org_amount, i.amount_vat, i.amount_ex_vat, i.refunded_amount,
           i.authorized_amount, i.country, i.plan, i.category, i.states,
           c.email AS customer_email
    FROM invoices i
    LEFT JOIN customers c ON c.handle = i.customer
    WHERE i.created >= $1
      AND i.created < $2
      AND ($3::TEXT IS NULL OR i.category = $3)
    ORDER BY i.created DESC, i.id
"#;

/// Database row representation of an invoice, optionally joined with the
/// owning customer's email.
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: String,
    handle: String,
    customer: String,
    currency: String,
    created: DateTime<Utc>,
    discount_amount: i64,
    org_amount: i64,
    amount_vat: i64,
    amount_ex_vat: i64,
    refunded_amount: i64,
    authorized_amount: i64,
    country: String,
    plan: Option<String>,
    category: String,
    states: Json<InvoiceStates>,
    customer_email: Option<String>,
}

impl TryFrom<InvoiceRow> for InvoiceReportRow {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let country: Country = row.country.parse().map_err(|e| {
            DomainError::serialization(format!("Invalid country value: {}", e))
                .with_detail("id", row.id.clone())
        })?;
        let category: InvoiceCategory = row.category.parse().map_err(|e| {
            DomainError::serialization(format!("Invalid category value: {}", e))
                .with_detail("id", row.id.clone())
        })?;

        Ok(InvoiceReportRow {
            invoice: Invoice {
                id: row.id,
                handle: row.handle,
                customer: row.customer,
                currency: row.currency,
                created: row.created,
                discount_amount: row.discount_amount,
                org_amount: row.org_amount,
                amount_vat: row.amount_vat,
                amount_ex_vat: row.amount_ex_vat,
                refunded_amount: row.refunded_amount,
                authorized_amount: row.authorized_amount,
                country,
                plan: row.plan,
                category,
                states: row.states.0,
            },
            customer_email: row.customer_email,
        })
    }
}

fn category_filter(filter: InvoiceFilter) -> Option<&'static str> {
    match filter {
        InvoiceFilter::All => None,
        InvoiceFilter::Category(category) => Some(category.as_str()),
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn upsert(&self, invoice: &Invoice) -> Result<(), DomainError> {
        sqlx::query(UPSERT_INVOICE)
            .bind(&invoice.id)
            .bind(&invoice.handle)
            .bind(&invoice.customer)
            .bind(&invoice.currency)
            .bind(invoice.created)
            .bind(invoice.discount_amount)
            .bind(invoice.org_amount)
            .bind(invoice.amount_vat)
            .bind(invoice.amount_ex_vat)
            .bind(invoice.refunded_amount)
            .bind(invoice.authorized_amount)
            .bind(invoice.country.code())
            .bind(&invoice.plan)
            .bind(invoice.category.as_str())
            .bind(Json(&invoice.states))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to upsert invoice: {}", e))
                    .with_detail("id", invoice.id.clone())
            })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, DomainError> {
        let row: Option<InvoiceRow> = sqlx::query_as(SELECT_INVOICE_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find invoice: {}", e)))?;

        row.map(|r| InvoiceReportRow::try_from(r).map(|report| report.invoice))
            .transpose()
    }

    async fn find_by_created_range(
        &self,
        range: &DateRange,
        filter: InvoiceFilter,
    ) -> Result<Vec<InvoiceReportRow>, DomainError> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(SELECT_INVOICES_IN_RANGE)
            .bind(range.from())
            .bind(range.to())
            .bind(category_filter(filter))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to query invoices: {}", e)))?;

        rows.into_iter().map(InvoiceReportRow::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn row(country: &str, category: &str) -> InvoiceRow {
        InvoiceRow {
            id: "i1".to_string(),
            handle: "inv-1".to_string(),
            customer: "c1".to_string(),
            currency: "DKK".to_string(),
            created: Utc::now(),
            discount_amount: 0,
            org_amount: 0,
            amount_vat: 0,
            amount_ex_vat: 0,
            refunded_amount: 0,
            authorized_amount: 0,
            country: country.to_string(),
            plan: None,
            category: category.to_string(),
            states: Json(InvoiceStates::new()),
            customer_email: None,
        }
    }

    #[test]
    fn category_filter_uses_stored_category_strings() {
        assert_eq!(category_filter(InvoiceFilter::All), None);
        assert_eq!(
            category_filter(InvoiceFilter::Category(InvoiceCategory::VirtualOffice)),
            Some("virtual_office")
        );
    }

    #[test]
    fn range_query_is_half_open_and_newest_first() {
        assert!(SELECT_INVOICES_IN_RANGE.contains("i.created >= $1"));
        assert!(SELECT_INVOICES_IN_RANGE.contains("i.created < $2"));
        assert!(SELECT_INVOICES_IN_RANGE.contains("ORDER BY i.created DESC"));
    }

    #[test]
    fn row_with_unknown_country_is_a_serialization_error() {
        let err = InvoiceReportRow::try_from(row("FI", "virtual_office")).unwrap_err();
        assert_eq!(err.code, ErrorCode::SerializationError);
        assert_eq!(err.details.get("id"), Some(&"i1".to_string()));
    }

    #[test]
    fn row_with_unknown_category_is_a_serialization_error() {
        let err = InvoiceReportRow::try_from(row("DK", "premium")).unwrap_err();
        assert_eq!(err.code, ErrorCode::SerializationError);
    }

    #[test]
    fn valid_row_maps_to_report_row() {
        let report = InvoiceReportRow::try_from(row("SE", "standard")).unwrap();
        assert_eq!(report.invoice.country, Country::Se);
        assert_eq!(report.invoice.category, InvoiceCategory::Standard);
    }
}
