//! Wire response → domain record mapping.
//!
//! Pure functions: no I/O, deterministic. The country of an invoice is passed
//! in by the caller because the invoice payload does not reliably carry it.

use chrono::{DateTime, Utc};

use crate::domain::billing::{Customer, Invoice, InvoiceCategory, InvoiceStates};
use crate::domain::foundation::Country;
use crate::ports::ProviderError;

use super::wire_types::{CustomerResponse, InvoiceResponse, TransactionResponse};

/// Unix time of `0001-01-01T00:00:00Z`, which some provider serializers emit
/// in place of null.
const ZERO_INSTANT_SECS: i64 = -62_135_596_800;

/// Maps a customer response field by field.
pub fn map_customer(r: CustomerResponse) -> Customer {
    Customer {
        handle: r.handle,
        email: r.email,
        first_name: r.first_name,
        last_name: r.last_name,
        company: r.company,
        address: r.address,
        address2: r.address2,
        city: r.city,
        postal_code: r.postal_code,
        country: r.country,
        phone: r.phone,
        created: r.created,
        test: r.test,
        subscriptions: r.subscriptions,
        active_subscriptions: r.active_subscriptions,
        cancelled_subscriptions: r.cancelled_subscriptions,
        expired_subscriptions: r.expired_subscriptions,
        non_renewing_subscriptions: r.non_renewing_subscriptions,
        on_hold_subscriptions: r.on_hold_subscriptions,
        trial_active_subscriptions: r.trial_active_subscriptions,
        trial_cancelled_subscriptions: r.trial_cancelled_subscriptions,
        cancelled_invoices: r.cancelled_invoices,
        dunning_invoices: r.dunning_invoices,
        failed_invoices: r.failed_invoices,
        pending_invoices: r.pending_invoices,
        settled_invoices: r.settled_invoices,
        cancelled_amount: r.cancelled_amount,
        dunning_amount: r.dunning_amount,
        failed_amount: r.failed_amount,
        pending_amount: r.pending_amount,
        refunded_amount: r.refunded_amount,
        settled_amount: r.settled_amount,
        pending_additional_costs: r.pending_additional_costs,
        pending_additional_cost_amount: r.pending_additional_cost_amount,
        transferred_additional_costs: r.transferred_additional_costs,
        transferred_additional_cost_amount: r.transferred_additional_cost_amount,
        pending_credits: r.pending_credits,
        pending_credit_amount: r.pending_credit_amount,
        transferred_credits: r.transferred_credits,
        transferred_credit_amount: r.transferred_credit_amount,
    }
}

/// Maps an invoice response fetched from `country`'s account.
///
/// An invoice without a creation time cannot be placed in any report range
/// and is rejected as a decode error.
pub fn map_invoice(r: InvoiceResponse, country: Country) -> Result<Invoice, ProviderError> {
    let Some(created) = present(r.created) else {
        return Err(ProviderError::Decode(format!(
            "invoice {} has no created time",
            r.id
        )));
    };
    let states = map_states(&r.transactions);
    let category = InvoiceCategory::from_handle(&r.handle);

    Ok(Invoice {
        id: r.id,
        handle: r.handle,
        customer: r.customer,
        currency: r.currency,
        created,
        discount_amount: r.discount_amount,
        org_amount: r.org_amount,
        amount_vat: r.amount_vat,
        amount_ex_vat: r.amount_ex_vat,
        refunded_amount: r.refunded_amount,
        authorized_amount: r.authorized_amount,
        country,
        plan: r.plan.filter(|p| !p.is_empty()),
        category,
        states,
    })
}

/// Derives the state map from a transaction log.
///
/// One entry per distinct state string. The timestamp is the settlement time
/// if set, else the creation time, else null. When several transactions share
/// a state, the last one in log order wins.
pub fn map_states(transactions: &[TransactionResponse]) -> InvoiceStates {
    let mut states = InvoiceStates::new();
    for tx in transactions {
        let at = present(tx.settled).or_else(|| present(tx.created));
        states.record(tx.state.clone(), at);
    }
    states
}

fn present(at: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    at.filter(|t| t.timestamp() != ZERO_INSTANT_SECS)
}
