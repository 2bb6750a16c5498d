//! Mock billing provider for testing.
//!
//! Provides a configurable implementation of `BillingProvider` for unit and
//! integration tests. Supports:
//! - Pre-configured customers and invoices per country
//! - Scripted listing pages
//! - Error injection, permanent or for a fixed number of calls
//! - Call tracking

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::billing::{Customer, Invoice, ResourceKind};
use crate::domain::foundation::Country;
use crate::ports::{BillingProvider, Page, ProviderError};

/// Mock billing provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockBillingProvider::new();
/// mock.add_invoice(Country::Dk, invoice);
/// mock.fail_times("fetch_invoice", 2, ProviderError::Network("reset".into()));
/// ```
#[derive(Default)]
pub struct MockBillingProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    customers: HashMap<(Country, String), Customer>,
    invoices: HashMap<(Country, String), Invoice>,

    /// Listing pages per country, in order.
    customer_pages: HashMap<Country, Vec<Page<Customer>>>,
    invoice_pages: HashMap<Country, Vec<Page<Invoice>>>,

    /// Errors returned on every call to a method.
    method_errors: HashMap<String, ProviderError>,

    /// Errors consumed one per call before a method starts succeeding.
    queued_errors: HashMap<String, VecDeque<ProviderError>>,

    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub country: Country,
    pub arg: Option<String>,
}

impl MockBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Make a customer fetchable from `country`'s account.
    pub fn add_customer(&self, country: Country, customer: Customer) {
        let handle = customer.handle.clone();
        self.inner
            .lock()
            .unwrap()
            .customers
            .insert((country, handle), customer);
    }

    /// Make an invoice fetchable from `country`'s account.
    pub fn add_invoice(&self, country: Country, invoice: Invoice) {
        let id = invoice.id.clone();
        self.inner
            .lock()
            .unwrap()
            .invoices
            .insert((country, id), invoice);
    }

    /// Append a customer listing page. `next` links it to the following page.
    pub fn push_customer_page(&self, country: Country, items: Vec<Customer>, next: Option<&str>) {
        self.inner
            .lock()
            .unwrap()
            .customer_pages
            .entry(country)
            .or_default()
            .push(Page::new(items, next.map(str::to_string)));
    }

    /// Append an invoice listing page.
    pub fn push_invoice_page(&self, country: Country, items: Vec<Invoice>, next: Option<&str>) {
        self.inner
            .lock()
            .unwrap()
            .invoice_pages
            .entry(country)
            .or_default()
            .push(Page::new(items, next.map(str::to_string)));
    }

    /// Append an invoice page on which `skipped` records could not be mapped.
    pub fn push_partial_invoice_page(
        &self,
        country: Country,
        items: Vec<Invoice>,
        skipped: u64,
        next: Option<&str>,
    ) {
        self.inner
            .lock()
            .unwrap()
            .invoice_pages
            .entry(country)
            .or_default()
            .push(Page::new(items, next.map(str::to_string)).with_skipped(skipped));
    }

    /// Fail every call to `method`.
    pub fn set_method_error(&self, method: &str, error: ProviderError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Fail the next `times` calls to `method`, then behave normally.
    pub fn fail_times(&self, method: &str, times: usize, error: ProviderError) {
        let mut state = self.inner.lock().unwrap();
        let queue = state.queued_errors.entry(method.to_string()).or_default();
        for _ in 0..times {
            queue.push_back(error.clone());
        }
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.method_errors.clear();
        state.queued_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, country: Country, arg: Option<&str>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            country,
            arg: arg.map(str::to_string),
        });
    }

    fn check_error(&self, method: &str) -> Result<(), ProviderError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state
            .queued_errors
            .get_mut(method)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }

        Ok(())
    }
}

/// Selects the page addressed by `token`: the first page for `None`, else
/// the page following the one that handed out `token`.
fn select_page<T: Clone>(
    pages: Option<&Vec<Page<T>>>,
    token: Option<&str>,
) -> Result<Page<T>, ProviderError> {
    let pages = match pages {
        Some(pages) if !pages.is_empty() => pages,
        _ => return Ok(Page::last(Vec::new())),
    };

    let index = match token {
        None => 0,
        Some(token) => pages
            .iter()
            .position(|p| p.next_page_token.as_deref() == Some(token))
            .map(|i| i + 1)
            .ok_or_else(|| ProviderError::UnexpectedStatus {
                status: 400,
                body: format!("unknown page token {}", token),
            })?,
    };

    pages
        .get(index)
        .cloned()
        .ok_or_else(|| ProviderError::UnexpectedStatus {
            status: 400,
            body: "page token points past the last page".to_string(),
        })
}

impl Clone for MockBillingProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    async fn fetch_customer(
        &self,
        handle: &str,
        country: Country,
    ) -> Result<Customer, ProviderError> {
        self.record_call("fetch_customer", country, Some(handle));
        self.check_error("fetch_customer")?;

        let state = self.inner.lock().unwrap();
        state
            .customers
            .get(&(country, handle.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::not_found(ResourceKind::Customer, handle))
    }

    async fn fetch_invoice(&self, id: &str, country: Country) -> Result<Invoice, ProviderError> {
        self.record_call("fetch_invoice", country, Some(id));
        self.check_error("fetch_invoice")?;

        let state = self.inner.lock().unwrap();
        state
            .invoices
            .get(&(country, id.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::not_found(ResourceKind::Invoice, id))
    }

    async fn list_customers(
        &self,
        page_token: Option<&str>,
        country: Country,
    ) -> Result<Page<Customer>, ProviderError> {
        self.record_call("list_customers", country, page_token);
        self.check_error("list_customers")?;

        let state = self.inner.lock().unwrap();
        select_page(state.customer_pages.get(&country), page_token)
    }

    async fn list_invoices(
        &self,
        page_token: Option<&str>,
        country: Country,
    ) -> Result<Page<Invoice>, ProviderError> {
        self.record_call("list_invoices", country, page_token);
        self.check_error("list_invoices")?;

        let state = self.inner.lock().unwrap();
        select_page(state.invoice_pages.get(&country), page_token)
    }
}
