//! Provider-specific types for API responses.
//!
//! These types represent provider resources as they arrive over the wire.
//! They are designed to:
//! - Parse actual provider JSON leniently (absent fields default)
//! - Stay free of domain rules; mapping lives in `mapper`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Customer
// ════════════════════════════════════════════════════════════════════════════════

/// Customer resource (`GET /v1/customer/{handle}`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CustomerResponse {
    pub handle: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub test: bool,

    pub subscriptions: i32,
    pub active_subscriptions: i32,
    pub cancelled_subscriptions: i32,
    pub expired_subscriptions: i32,
    pub non_renewing_subscriptions: i32,
    pub on_hold_subscriptions: i32,
    pub trial_active_subscriptions: i32,
    pub trial_cancelled_subscriptions: i32,

    pub cancelled_invoices: i32,
    pub dunning_invoices: i32,
    pub failed_invoices: i32,
    pub pending_invoices: i32,
    pub settled_invoices: i32,

    pub cancelled_amount: i64,
    pub dunning_amount: i64,
    pub failed_amount: i64,
    pub pending_amount: i64,
    pub refunded_amount: i64,
    pub settled_amount: i64,

    pub pending_additional_costs: i32,
    pub pending_additional_cost_amount: i64,
    pub transferred_additional_costs: i32,
    pub transferred_additional_cost_amount: i64,
    pub pending_credits: i32,
    pub pending_credit_amount: i64,
    pub transferred_credits: i32,
    pub transferred_credit_amount: i64,
}

// ════════════════════════════════════════════════════════════════════════════════
// Invoice
// ════════════════════════════════════════════════════════════════════════════════

/// Invoice resource (`GET /v1/invoice/{id}`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceResponse {
    pub id: String,
    #[serde(default)]
    pub handle: String,
    /// Owning customer's handle.
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub currency: String,
    /// Null or absent on some malformed records.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount_amount: i64,
    #[serde(default)]
    pub org_amount: i64,
    #[serde(default)]
    pub amount_vat: i64,
    #[serde(default)]
    pub amount_ex_vat: i64,
    #[serde(default)]
    pub refunded_amount: i64,
    #[serde(default)]
    pub authorized_amount: i64,
    /// Plan handle for subscription invoices.
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub transactions: Vec<TransactionResponse>,
}

/// Entry of an invoice's transaction log.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionResponse {
    pub id: Option<String>,
    /// Lifecycle state this transaction reached (`authorized`, `settled`, ...).
    pub state: String,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub amount: Option<i64>,
    pub created: Option<DateTime<Utc>>,
    pub settled: Option<DateTime<Utc>>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Listings
// ════════════════════════════════════════════════════════════════════════════════

/// Page envelope of `GET /v1/list/{resource}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorResponse {
    pub code: Option<i32>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub request_id: Option<String>,
}
