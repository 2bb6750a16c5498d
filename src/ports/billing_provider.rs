//! Billing provider port.
//!
//! Defines the contract for reading customers and invoices from the payment
//! service provider. Implementations select credentials per country and map
//! wire responses into domain records.
//!
//! # Design
//!
//! - **Read-only**: the sync never writes to the provider
//! - **Explicit not-found**: a missing resource is an error variant, never an
//!   empty record
//! - **Opaque pagination**: continuation tokens are passed back verbatim

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::billing::{Customer, Invoice, ResourceKind};
use crate::domain::foundation::Country;

/// Port for the upstream billing provider.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Fetch a customer by handle from the given country's account.
    async fn fetch_customer(&self, handle: &str, country: Country)
        -> Result<Customer, ProviderError>;

    /// Fetch an invoice by ID from the given country's account.
    async fn fetch_invoice(&self, id: &str, country: Country) -> Result<Invoice, ProviderError>;

    /// Fetch one page of customers.
    ///
    /// `page_token` is `None` for the first page, then the previous page's
    /// `next_page_token`.
    async fn list_customers(
        &self,
        page_token: Option<&str>,
        country: Country,
    ) -> Result<Page<Customer>, ProviderError>;

    /// Fetch one page of invoices.
    async fn list_invoices(
        &self,
        page_token: Option<&str>,
        country: Country,
    ) -> Result<Page<Invoice>, ProviderError>;
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token for the following page; `None` on the last page.
    pub next_page_token: Option<String>,
    /// Records on this page that could not be mapped and were left out.
    pub skipped: u64,
}

impl<T> Page<T> {
    /// Builds a page, treating an empty token as the end of the listing.
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token: next_page_token.filter(|t| !t.is_empty()),
            skipped: 0,
        }
    }

    pub fn with_skipped(mut self, skipped: u64) -> Self {
        self.skipped = skipped;
        self
    }

    /// Builds the final page of a listing.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    pub fn is_last(&self) -> bool {
        self.next_page_token.is_none()
    }
}

/// Failures talking to the provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider answered 404 for this resource.
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: String },

    /// Any other non-200 response.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        ProviderError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }

    /// Whether a later attempt could plausibly succeed.
    ///
    /// Network failures, throttling and provider-side errors are transient.
    /// Not-found, other client errors and decode failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network(_) => true,
            ProviderError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            ProviderError::NotFound { .. } | ProviderError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn BillingProvider) {}
    }

    #[test]
    fn empty_next_token_ends_pagination() {
        let page = Page::new(vec![1, 2], Some(String::new()));
        assert!(page.is_last());

        let page = Page::new(vec![1, 2], Some("abc".to_string()));
        assert!(!page.is_last());
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn not_found_displays_resource_and_id() {
        let err = ProviderError::not_found(ResourceKind::Invoice, "missing");
        assert_eq!(err.to_string(), "invoice missing not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn retryability_follows_error_class() {
        assert!(ProviderError::Network("reset".into()).is_retryable());
        assert!(ProviderError::UnexpectedStatus { status: 503, body: String::new() }.is_retryable());
        assert!(ProviderError::UnexpectedStatus { status: 429, body: String::new() }.is_retryable());
        assert!(!ProviderError::UnexpectedStatus { status: 401, body: String::new() }.is_retryable());
        assert!(!ProviderError::not_found(ResourceKind::Customer, "c").is_retryable());
        assert!(!ProviderError::Decode("eof".into()).is_retryable());
    }
}
