//! PostgreSQL implementation of CustomerRepository.
//!
//! One row per customer handle. Upserts overwrite every column, so the row
//! always reflects the latest provider snapshot.

use crate::domain::billing::Customer;
use crate::domain::foundation::DomainError;
use crate::ports::CustomerRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// PostgreSQL implementation of the CustomerRepository port.
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CUSTOMER_COLUMNS: &str = r#"
    handle, email, first_name, last_name, company, address, address2, city,
    postal_code, country, phone, created, test, subscriptions, active_subscriptions,
    cancelled_subscriptions, expired_subscriptions, non_renewing_subscriptions,
    on_hold_subscriptions, trial_active_subscriptions,
    trial_cancelled_subscriptions, cancelled_invoices, dunning_invoices,
    failed_invoices, pending_invoices, settled_invoices, cancelled_amount,
    dunning_amount, failed_amount, pending_amount, refunded_amount, settled_amount,
    pending_additional_costs, pending_additional_cost_amount,
    transferred_additional_costs, transferred_additional_cost_amount,
    pending_credits, pending_credit_amount, transferred_credits,
    transferred_credit_amount
"#;

const UPSERT_CUSTOMER: &str = r#"
    INSERT INTO customers (
        handle, email, first_name, last_name, company, address, address2, city,
        postal_code, country, phone, created, test, subscriptions, active_subscriptions,
        cancelled_subscriptions, expired_subscriptions, non_renewing_subscriptions,
        on_hold_subscriptions, trial_active_subscriptions,
        trial_cancelled_subscriptions, cancelled_invoices, dunning_invoices,
        failed_invoices, pending_invoices, settled_invoices, cancelled_amount,
        dunning_amount, failed_amount, pending_amount, refunded_amount, settled_amount,
        pending_additional_costs, pending_additional_cost_amount,
        transferred_additional_costs, transferred_additional_cost_amount,
        pending_credits, pending_credit_amount, transferred_credits,
        transferred_credit_amount
    ) VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
        $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
        $29, $30, $31, $32, $33, $34, $35, $36, $37, $38, $39, $40
    )
    ON CONFLICT (handle) DO UPDATE SET
        email = EXCLUDED.email,
        first_name = EXCLUDED.first_name,
        last_name = EXCLUDED.last_name,
        company = EXCLUDED.company,
        address = EXCLUDED.address,
        address2 = EXCLUDED.address2,
        city = EXCLUDED.city,
        postal_code = EXCLUDED.postal_code,
        country = EXCLUDED.country,
        phone = EXCLUDED.phone,
        created = EXCLUDED.created,
        test = EXCLUDED.test,
        subscriptions = EXCLUDED.subscriptions,
        active_subscriptions = EXCLUDED.active_subscriptions,
        cancelled_subscriptions = EXCLUDED.cancelled_subscriptions,
        expired_subscriptions = EXCLUDED.expired_subscriptions,
        non_renewing_subscriptions = EXCLUDED.non_renewing_subscriptions,
        on_hold_subscriptions = EXCLUDED.on_hold_subscriptions,
        trial_active_subscriptions = EXCLUDED.trial_active_subscriptions,
        trial_cancelled_subscriptions = EXCLUDED.trial_cancelled_subscriptions,
        cancelled_invoices = EXCLUDED.cancelled_invoices,
        dunning_invoices = EXCLUDED.dunning_invoices,
        failed_invoices = EXCLUDED.failed_invoices,
        pending_invoices = EXCLUDED.pending_invoices,
        settled_invoices = EXCLUDED.settled_invoices,
        cancelled_amount = EXCLUDED.cancelled_amount,
        dunning_amount = EXCLUDED.dunning_amount,
        failed_amount = EXCLUDED.failed_amount,
        pending_amount = EXCLUDED.pending_amount,
        refunded_amount = EXCLUDED.refunded_amount,
        settled_amount = EXCLUDED.settled_amount,
        pending_additional_costs = EXCLUDED.pending_additional_costs,
        pending_additional_cost_amount = EXCLUDED.pending_additional_cost_amount,
        transferred_additional_costs = EXCLUDED.transferred_additional_costs,
        transferred_additional_cost_amount = EXCLUDED.transferred_additional_cost_amount,
        pending_credits = EXCLUDED.pending_credits,
        pending_credit_amount = EXCLUDED.pending_credit_amount,
        transferred_credits = EXCLUDED.transferred_credits,
        transferred_credit_amount = EXCLUDED.transferred_credit_amount
"#;

/// Database row representation of a customer.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    handle: String,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    company: Option<String>,
    address: Option<String>,
    address2: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    phone: Option<String>,
    created: Option<DateTime<Utc>>,
    test: bool,
    subscriptions: i32,
    active_subscriptions: i32,
    cancelled_subscriptions: i32,
    expired_subscriptions: i32,
    non_renewing_subscriptions: i32,
    on_hold_subscriptions: i32,
    trial_active_subscriptions: i32,
    trial_cancelled_subscriptions: i32,
    cancelled_invoices: i32,
    dunning_invoices: i32,
    failed_invoices: i32,
    pending_invoices: i32,
    settled_invoices: i32,
    cancelled_amount: i64,
    dunning_amount: i64,
    failed_amount: i64,
    pending_amount: i64,
    refunded_amount: i64,
    settled_amount: i64,
    pending_additional_costs: i32,
    pending_additional_cost_amount: i64,
    transferred_additional_costs: i32,
    transferred_additional_cost_amount: i64,
    pending_credits: i32,
    pending_credit_amount: i64,
    transferred_credits: i32,
    transferred_credit_amount: i64,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            handle: row.handle,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            company: row.company,
            address: row.address,
            address2: row.address2,
            city: row.city,
            postal_code: row.postal_code,
            country: row.country,
            phone: row.phone,
            created: row.created,
            test: row.test,
            subscriptions: row.subscriptions,
            active_subscriptions: row.active_subscriptions,
            cancelled_subscriptions: row.cancelled_subscriptions,
            expired_subscriptions: row.expired_subscriptions,
            non_renewing_subscriptions: row.non_renewing_subscriptions,
            on_hold_subscriptions: row.on_hold_subscriptions,
            trial_active_subscriptions: row.trial_active_subscriptions,
            trial_cancelled_subscriptions: row.trial_cancelled_subscriptions,
            cancelled_invoices: row.cancelled_invoices,
            dunning_invoices: row.dunning_invoices,
            failed_invoices: row.failed_invoices,
            pending_invoices: row.pending_invoices,
            settled_invoices: row.settled_invoices,
            cancelled_amount: row.cancelled_amount,
            dunning_amount: row.dunning_amount,
            failed_amount: row.failed_amount,
            pending_amount: row.pending_amount,
            refunded_amount: row.refunded_amount,
            settled_amount: row.settled_amount,
            pending_additional_costs: row.pending_additional_costs,
            pending_additional_cost_amount: row.pending_additional_cost_amount,
            transferred_additional_costs: row.transferred_additional_costs,
            transferred_additional_cost_amount: row.transferred_additional_cost_amount,
            pending_credits: row.pending_credits,
            pending_credit_amount: row.pending_credit_amount,
            transferred_credits: row.transferred_credits,
            transferred_credit_amount: row.transferred_credit_amount,
        }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn upsert(&self, customer: &Customer) -> Result<(), DomainError> {
        sqlx::query(UPSERT_CUSTOMER)
            .bind(&customer.handle)
            .bind(&customer.email)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.company)
            .bind(&customer.address)
            .bind(&customer.address2)
            .bind(&customer.city)
            .bind(&customer.postal_code)
            .bind(&customer.country)
            .bind(&customer.phone)
            .bind(customer.created)
            .bind(customer.test)
            .bind(customer.subscriptions)
            .bind(customer.active_subscriptions)
            .bind(customer.cancelled_subscriptions)
            .bind(customer.expired_subscriptions)
            .bind(customer.non_renewing_subscriptions)
            .bind(customer.on_hold_subscriptions)
            .bind(customer.trial_active_subscriptions)
            .bind(customer.trial_cancelled_subscriptions)
            .bind(customer.cancelled_invoices)
            .bind(customer.dunning_invoices)
            .bind(customer.failed_invoices)
            .bind(customer.pending_invoices)
            .bind(customer.settled_invoices)
            .bind(customer.cancelled_amount)
            .bind(customer.dunning_amount)
            .bind(customer.failed_amount)
            .bind(customer.pending_amount)
            .bind(customer.refunded_amount)
            .bind(customer.settled_amount)
            .bind(customer.pending_additional_costs)
            .bind(customer.pending_additional_cost_amount)
            .bind(customer.transferred_additional_costs)
            .bind(customer.transferred_additional_cost_amount)
            .bind(customer.pending_credits)
            .bind(customer.pending_credit_amount)
            .bind(customer.transferred_credits)
            .bind(customer.transferred_credit_amount)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to upsert customer: {}", e))
                    .with_detail("handle", customer.handle.clone())
            })?;

        Ok(())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Customer>, DomainError> {
        let sql = format!("SELECT {} FROM customers WHERE handle = $1", CUSTOMER_COLUMNS);
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find customer: {}", e)))?;

        Ok(row.map(Customer::from))
    }
}
