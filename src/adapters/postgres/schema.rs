//! Table definitions for the billing mirror.
//!
//! Applied at startup. Every statement is idempotent, so running it against
//! an initialized database is a no-op.

use sqlx::PgPool;

use crate::domain::foundation::DomainError;

const CREATE_CUSTOMERS: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    handle                              TEXT PRIMARY KEY,
    email                               TEXT,
    first_name                          TEXT,
    last_name                           TEXT,
    company                             TEXT,
    address                             TEXT,
    address2                            TEXT,
    city                                TEXT,
    postal_code                         TEXT,
    country                             TEXT,
    phone                               TEXT,
    created                             TIMESTAMPTZ,
    test                                BOOLEAN NOT NULL DEFAULT FALSE,
    subscriptions                       INTEGER NOT NULL DEFAULT 0,
    active_subscriptions                INTEGER NOT NULL DEFAULT 0,
    cancelled_subscriptions             INTEGER NOT NULL DEFAULT 0,
    expired_subscriptions               INTEGER NOT NULL DEFAULT 0,
    non_renewing_subscriptions          INTEGER NOT NULL DEFAULT 0,
    on_hold_subscriptions               INTEGER NOT NULL DEFAULT 0,
    trial_active_subscriptions          INTEGER NOT NULL DEFAULT 0,
    trial_cancelled_subscriptions       INTEGER NOT NULL DEFAULT 0,
    cancelled_invoices                  INTEGER NOT NULL DEFAULT 0,
    dunning_invoices                    INTEGER NOT NULL DEFAULT 0,
    failed_invoices                     INTEGER NOT NULL DEFAULT 0,
    pending_invoices                    INTEGER NOT NULL DEFAULT 0,
    settled_invoices                    INTEGER NOT NULL DEFAULT 0,
    cancelled_amount                    BIGINT NOT NULL DEFAULT 0,
    dunning_amount                      BIGINT NOT NULL DEFAULT 0,
    failed_amount                       BIGINT NOT NULL DEFAULT 0,
    pending_amount                      BIGINT NOT NULL DEFAULT 0,
    refunded_amount                     BIGINT NOT NULL DEFAULT 0,
    settled_amount                      BIGINT NOT NULL DEFAULT 0,
    pending_additional_costs            INTEGER NOT NULL DEFAULT 0,
    pending_additional_cost_amount      BIGINT NOT NULL DEFAULT 0,
    transferred_additional_costs        INTEGER NOT NULL DEFAULT 0,
    transferred_additional_cost_amount  BIGINT NOT NULL DEFAULT 0,
    pending_credits                     INTEGER NOT NULL DEFAULT 0,
    pending_credit_amount               BIGINT NOT NULL DEFAULT 0,
    transferred_credits                 INTEGER NOT NULL DEFAULT 0,
    transferred_credit_amount           BIGINT NOT NULL DEFAULT 0
)
"#;

const CREATE_INVOICES: &str = r#"
CREATE TABLE IF NOT EXISTS invoices (
    id                  TEXT PRIMARY KEY,
    handle              TEXT NOT NULL,
    customer            TEXT NOT NULL,
    currency            TEXT NOT NULL,
    created             TIMESTAMPTZ NOT NULL,
    discount_amount     BIGINT NOT NULL DEFAULT 0,
    org_amount          BIGINT NOT NULL DEFAULT 0,
    amount_vat          BIGINT NOT NULL DEFAULT 0,
    amount_ex_vat       BIGINT NOT NULL DEFAULT 0,
    refunded_amount     BIGINT NOT NULL DEFAULT 0,
    authorized_amount   BIGINT NOT NULL DEFAULT 0,
    country             TEXT NOT NULL,
    plan                TEXT,
    category            TEXT NOT NULL,
    states              JSONB NOT NULL DEFAULT '{}'::jsonb
)
"#;

const CREATE_INVOICES_CREATED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS invoices_created_idx ON invoices (created)";

const CREATE_INVOICES_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS invoices_category_created_idx ON invoices (category, created)";

/// Statements applied by [`ensure_schema`], in order.
pub const SCHEMA_STATEMENTS: [&str; 4] = [
    CREATE_CUSTOMERS,
    CREATE_INVOICES,
    CREATE_INVOICES_CREATED_INDEX,
    CREATE_INVOICES_CATEGORY_INDEX,
];

/// Creates the customer and invoice tables if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DomainError> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to apply schema: {}", e)))?;
    }
    tracing::info!("Database schema ready");
    Ok(())
}
