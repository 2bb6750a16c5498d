//! Invoice record, lifecycle state map and reporting category.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Country, ValidationError};

/// Handle prefix the provider account uses for virtual-office invoices.
const VIRTUAL_OFFICE_HANDLE_PREFIX: &str = "inv";

/// Lifecycle state name → time the state was observed.
///
/// Keys are whatever state strings the provider reports; unknown states are
/// kept as-is. A `None` value means the state is present in the transaction
/// log but carried no usable timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceStates(BTreeMap<String, Option<DateTime<Utc>>>);

impl InvoiceStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `state`, replacing any earlier timestamp for it.
    pub fn record(&mut self, state: impl Into<String>, at: Option<DateTime<Utc>>) {
        self.0.insert(state.into(), at);
    }

    /// Timestamp of `state`; `None` if the state is absent, `Some(None)` if
    /// present without a time.
    pub fn get(&self, state: &str) -> Option<Option<DateTime<Utc>>> {
        self.0.get(state).copied()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.0.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<DateTime<Utc>>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, Option<DateTime<Utc>>)> for InvoiceStates {
    fn from_iter<T: IntoIterator<Item = (String, Option<DateTime<Utc>>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reporting segment of an invoice, fixed when the invoice is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceCategory {
    /// Virtual-office subscription invoices.
    VirtualOffice,
    #[default]
    Standard,
}

impl InvoiceCategory {
    /// Classifies an invoice by its handle. The prefix match ignores ASCII case.
    pub fn from_handle(handle: &str) -> Self {
        let prefix = handle.get(..VIRTUAL_OFFICE_HANDLE_PREFIX.len());
        if prefix.is_some_and(|p| p.eq_ignore_ascii_case(VIRTUAL_OFFICE_HANDLE_PREFIX)) {
            InvoiceCategory::VirtualOffice
        } else {
            InvoiceCategory::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceCategory::VirtualOffice => "virtual_office",
            InvoiceCategory::Standard => "standard",
        }
    }
}

impl FromStr for InvoiceCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "virtual_office" => Ok(InvoiceCategory::VirtualOffice),
            "standard" => Ok(InvoiceCategory::Standard),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown invoice category '{}'", other),
            )),
        }
    }
}

impl fmt::Display for InvoiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider invoice, keyed by its ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub handle: String,
    /// Handle of the owning customer.
    pub customer: String,
    pub currency: String,
    pub created: DateTime<Utc>,
    pub discount_amount: i64,
    pub org_amount: i64,
    pub amount_vat: i64,
    pub amount_ex_vat: i64,
    pub refunded_amount: i64,
    pub authorized_amount: i64,
    /// Account the invoice was fetched from.
    pub country: Country,
    pub plan: Option<String>,
    pub category: InvoiceCategory,
    pub states: InvoiceStates,
}
