//! Webhook event classification.
//!
//! The provider notifies us about many event types. Only invoice and customer
//! events lead to a sync; everything else is acknowledged and dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Resource kinds this service keeps in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Customer,
    Invoice,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Customer => "customer",
            ResourceKind::Invoice => "invoice",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event types delivered by the provider's webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WebhookEventKind {
    InvoiceCreated,
    InvoiceAuthorized,
    InvoiceSettled,
    InvoiceFailed,
    InvoiceRefund,
    CustomerCreated,
    CustomerChanged,
    /// Still triggers a refresh; the provider reflects the deletion.
    CustomerDeleted,
    /// Anything we do not sync.
    Unknown(String),
}

impl WebhookEventKind {
    /// Classifies a raw `event_type` string.
    pub fn parse(event_type: &str) -> Self {
        match event_type {
            "invoice_created" => WebhookEventKind::InvoiceCreated,
            "invoice_authorized" => WebhookEventKind::InvoiceAuthorized,
            "invoice_settled" => WebhookEventKind::InvoiceSettled,
            "invoice_failed" => WebhookEventKind::InvoiceFailed,
            "invoice_refund" => WebhookEventKind::InvoiceRefund,
            "customer_created" => WebhookEventKind::CustomerCreated,
            "customer_changed" => WebhookEventKind::CustomerChanged,
            "customer_deleted" => WebhookEventKind::CustomerDeleted,
            other => WebhookEventKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventKind::InvoiceCreated => "invoice_created",
            WebhookEventKind::InvoiceAuthorized => "invoice_authorized",
            WebhookEventKind::InvoiceSettled => "invoice_settled",
            WebhookEventKind::InvoiceFailed => "invoice_failed",
            WebhookEventKind::InvoiceRefund => "invoice_refund",
            WebhookEventKind::CustomerCreated => "customer_created",
            WebhookEventKind::CustomerChanged => "customer_changed",
            WebhookEventKind::CustomerDeleted => "customer_deleted",
            WebhookEventKind::Unknown(raw) => raw,
        }
    }

    /// The resource this event asks us to refresh, if any.
    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            WebhookEventKind::InvoiceCreated
            | WebhookEventKind::InvoiceAuthorized
            | WebhookEventKind::InvoiceSettled
            | WebhookEventKind::InvoiceFailed
            | WebhookEventKind::InvoiceRefund => Some(ResourceKind::Invoice),
            WebhookEventKind::CustomerCreated
            | WebhookEventKind::CustomerChanged
            | WebhookEventKind::CustomerDeleted => Some(ResourceKind::Customer),
            WebhookEventKind::Unknown(_) => None,
        }
    }
}

impl fmt::Display for WebhookEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single resource to fetch and persist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SyncTarget {
    /// Customer, by handle.
    Customer(String),
    /// Invoice, by ID.
    Invoice(String),
}

impl SyncTarget {
    /// Resolves the sync target of an event from its resource references.
    ///
    /// Returns `Ok(None)` for events we do not sync, and an error when a
    /// synced event lacks the reference it needs.
    pub fn for_event(
        kind: &WebhookEventKind,
        invoice: Option<&str>,
        customer: Option<&str>,
    ) -> Result<Option<Self>, ValidationError> {
        let Some(resource) = kind.resource() else {
            return Ok(None);
        };

        let reference = match resource {
            ResourceKind::Invoice => invoice,
            ResourceKind::Customer => customer,
        }
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::empty_field(resource.as_str()))?;

        Ok(Some(match resource {
            ResourceKind::Invoice => SyncTarget::Invoice(reference.to_string()),
            ResourceKind::Customer => SyncTarget::Customer(reference.to_string()),
        }))
    }

    pub fn resource(&self) -> ResourceKind {
        match self {
            SyncTarget::Customer(_) => ResourceKind::Customer,
            SyncTarget::Invoice(_) => ResourceKind::Invoice,
        }
    }

    /// The customer handle or invoice ID.
    pub fn id(&self) -> &str {
        match self {
            SyncTarget::Customer(id) | SyncTarget::Invoice(id) => id,
        }
    }
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.resource(), self.id())
    }
}
