//! Customer record as stored locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provider customer, keyed by its handle.
///
/// Every field is a straight copy of the provider's customer resource. The
/// record is replaced wholesale on every sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
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

    // Subscription counters
    pub subscriptions: i32,
    pub active_subscriptions: i32,
    pub cancelled_subscriptions: i32,
    pub expired_subscriptions: i32,
    pub non_renewing_subscriptions: i32,
    pub on_hold_subscriptions: i32,
    pub trial_active_subscriptions: i32,
    pub trial_cancelled_subscriptions: i32,

    // Invoice counters
    pub cancelled_invoices: i32,
    pub dunning_invoices: i32,
    pub failed_invoices: i32,
    pub pending_invoices: i32,
    pub settled_invoices: i32,

    // Amounts, in minor units
    pub cancelled_amount: i64,
    pub dunning_amount: i64,
    pub failed_amount: i64,
    pub pending_amount: i64,
    pub refunded_amount: i64,
    pub settled_amount: i64,

    // Additional costs and credits
    pub pending_additional_costs: i32,
    pub pending_additional_cost_amount: i64,
    pub transferred_additional_costs: i32,
    pub transferred_additional_cost_amount: i64,
    pub pending_credits: i32,
    pub pending_credit_amount: i64,
    pub transferred_credits: i32,
    pub transferred_credit_amount: i64,
}

impl Customer {
    /// Creates an otherwise empty customer with the given handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Default::default()
        }
    }
}
