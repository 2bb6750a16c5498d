//! BackfillOrchestrator - bulk historical sync of every provider account.
//!
//! For each country, pages through all customers and then all invoices,
//! upserting every record. A failed page fetch abandons the remaining pages
//! of that resource kind for that country only. A failed upsert is logged
//! and the record skipped.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `page_delay` | 100ms | Pause before each follow-up page, never lower |
//! | `countries` | DK, SE, NO | Accounts to walk, in order |

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::domain::billing::ResourceKind;
use crate::domain::foundation::Country;
use crate::ports::{BillingProvider, CustomerRepository, InvoiceRepository, Page};

/// Lowest allowed pause between page fetches.
pub const MIN_PAGE_DELAY: Duration = Duration::from_millis(100);

/// Configuration for a backfill run.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    pub page_delay: Duration,
    pub countries: Vec<Country>,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            page_delay: MIN_PAGE_DELAY,
            countries: Country::ALL.to_vec(),
        }
    }
}

impl BackfillConfig {
    /// Set the inter-page pause, clamped to at least 100ms.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay.max(MIN_PAGE_DELAY);
        self
    }

    pub fn with_countries(mut self, countries: Vec<Country>) -> Self {
        self.countries = countries;
        self
    }
}

/// Counters for one resource kind in one country.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindTotals {
    pub pages: u32,
    pub synced: u64,
    pub failed: u64,
    /// Pagination stopped early on a page-fetch error.
    pub aborted: bool,
}

impl KindTotals {
    fn add(&mut self, other: &KindTotals) {
        self.pages += other.pages;
        self.synced += other.synced;
        self.failed += other.failed;
        self.aborted |= other.aborted;
    }
}

/// Counters for one country.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountryTotals {
    pub customers: KindTotals,
    pub invoices: KindTotals,
}

/// Outcome of a full backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub countries: BTreeMap<String, CountryTotals>,
}

impl BackfillReport {
    /// Totals for `kind` summed across countries.
    pub fn total(&self, kind: ResourceKind) -> KindTotals {
        let mut total = KindTotals::default();
        for country in self.countries.values() {
            match kind {
                ResourceKind::Customer => total.add(&country.customers),
                ResourceKind::Invoice => total.add(&country.invoices),
            }
        }
        total
    }

    pub fn country(&self, country: Country) -> Option<&CountryTotals> {
        self.countries.get(country.code())
    }
}

/// Walks every provider listing and mirrors it into the store.
pub struct BackfillOrchestrator {
    provider: Arc<dyn BillingProvider>,
    customers: Arc<dyn CustomerRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    config: BackfillConfig,
}

impl BackfillOrchestrator {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        customers: Arc<dyn CustomerRepository>,
        invoices: Arc<dyn InvoiceRepository>,
    ) -> Self {
        Self::with_config(provider, customers, invoices, BackfillConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn BillingProvider>,
        customers: Arc<dyn CustomerRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        config: BackfillConfig,
    ) -> Self {
        Self {
            provider,
            customers,
            invoices,
            config,
        }
    }

    /// Run the backfill across all configured countries.
    pub async fn run(&self) -> BackfillReport {
        tracing::info!(countries = self.config.countries.len(), "Backfill started");
        let mut report = BackfillReport::default();

        for &country in &self.config.countries {
            let customers = self.backfill_customers(country).await;
            let invoices = self.backfill_invoices(country).await;

            tracing::info!(
                country = %country,
                customers_synced = customers.synced,
                customers_failed = customers.failed,
                invoices_synced = invoices.synced,
                invoices_failed = invoices.failed,
                "Backfill finished for country"
            );
            report.countries.insert(
                country.code().to_string(),
                CountryTotals {
                    customers,
                    invoices,
                },
            );
        }

        let customers = report.total(ResourceKind::Customer);
        let invoices = report.total(ResourceKind::Invoice);
        tracing::info!(
            customers_synced = customers.synced,
            customers_failed = customers.failed,
            invoices_synced = invoices.synced,
            invoices_failed = invoices.failed,
            "Backfill completed"
        );
        report
    }

    async fn backfill_customers(&self, country: Country) -> KindTotals {
        let mut totals = KindTotals::default();
        let mut token: Option<String> = None;

        loop {
            let page = match self.provider.list_customers(token.as_deref(), country).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(
                        country = %country,
                        page = totals.pages + 1,
                        error = %e,
                        "Customer page fetch failed, abandoning customers for country"
                    );
                    totals.aborted = true;
                    break;
                }
            };
            totals.pages += 1;

            for customer in &page.items {
                match self.customers.upsert(customer).await {
                    Ok(()) => totals.synced += 1,
                    Err(e) => {
                        totals.failed += 1;
                        tracing::warn!(
                            country = %country,
                            customer_handle = %customer.handle,
                            error = %e,
                            "Failed to store customer, skipping"
                        );
                    }
                }
            }

            tracing::debug!(
                country = %country,
                page = totals.pages,
                records = page.items.len(),
                "Customer page stored"
            );
            match self.advance(page).await {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        totals
    }

    async fn backfill_invoices(&self, country: Country) -> KindTotals {
        let mut totals = KindTotals::default();
        let mut token: Option<String> = None;

        loop {
            let page = match self.provider.list_invoices(token.as_deref(), country).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(
                        country = %country,
                        page = totals.pages + 1,
                        error = %e,
                        "Invoice page fetch failed, abandoning invoices for country"
                    );
                    totals.aborted = true;
                    break;
                }
            };
            totals.pages += 1;
            if page.skipped > 0 {
                totals.failed += page.skipped;
                tracing::warn!(
                    country = %country,
                    skipped = page.skipped,
                    "Invoice page contained unmappable records"
                );
            }

            for invoice in &page.items {
                match self.invoices.upsert(invoice).await {
                    Ok(()) => totals.synced += 1,
                    Err(e) => {
                        totals.failed += 1;
                        tracing::warn!(
                            country = %country,
                            invoice_id = %invoice.id,
                            error = %e,
                            "Failed to store invoice, skipping"
                        );
                    }
                }
            }

            tracing::debug!(
                country = %country,
                page = totals.pages,
                records = page.items.len(),
                "Invoice page stored"
            );
            match self.advance(page).await {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        totals
    }

    /// Returns the next token, sleeping the inter-page delay first if there is one.
    async fn advance<T>(&self, page: Page<T>) -> Option<String> {
        let next = page.next_page_token?;
        tokio::time::sleep(self.config.page_delay).await;
        Some(next)
    }
}
