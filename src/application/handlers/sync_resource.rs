//! SyncResourceHandler - Command handler that mirrors one provider resource.
//!
//! Fetches the referenced customer or invoice from the country's account and
//! upserts it. Shared by inline webhook handling and the worker pool.

use std::sync::Arc;

use crate::domain::billing::SyncTarget;
use crate::domain::foundation::Country;
use crate::ports::{BillingProvider, CustomerRepository, InvoiceRepository, ProviderError};

use crate::application::SyncError;

/// Command to sync one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResourceCommand {
    pub country: Country,
    pub target: SyncTarget,
}

/// Result of a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The record was fetched and written.
    Upserted,
    /// The provider does not know the resource; nothing was written.
    NotFound,
}

/// Handler for fetch-and-persist of a single resource.
pub struct SyncResourceHandler {
    provider: Arc<dyn BillingProvider>,
    customers: Arc<dyn CustomerRepository>,
    invoices: Arc<dyn InvoiceRepository>,
}

impl SyncResourceHandler {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        customers: Arc<dyn CustomerRepository>,
        invoices: Arc<dyn InvoiceRepository>,
    ) -> Self {
        Self {
            provider,
            customers,
            invoices,
        }
    }

    pub async fn handle(&self, cmd: SyncResourceCommand) -> Result<SyncOutcome, SyncError> {
        let result = match &cmd.target {
            SyncTarget::Customer(handle) => self.sync_customer(handle, cmd.country).await,
            SyncTarget::Invoice(id) => self.sync_invoice(id, cmd.country).await,
        };

        match result {
            // Deliberately acknowledged with no write, even inline: redelivery cannot create it.
            Err(SyncError::Provider(ProviderError::NotFound { .. })) => {
                tracing::warn!(
                    country = %cmd.country,
                    target = %cmd.target,
                    "Resource not found at provider, skipping"
                );
                Ok(SyncOutcome::NotFound)
            }
            other => other,
        }
    }

    async fn sync_customer(&self, handle: &str, country: Country) -> Result<SyncOutcome, SyncError> {
        let customer = self.provider.fetch_customer(handle, country).await?;
        self.customers.upsert(&customer).await?;

        tracing::info!(country = %country, customer_handle = %handle, "Customer synced");
        Ok(SyncOutcome::Upserted)
    }

    async fn sync_invoice(&self, id: &str, country: Country) -> Result<SyncOutcome, SyncError> {
        let invoice = self.provider.fetch_invoice(id, country).await?;
        self.invoices.upsert(&invoice).await?;

        tracing::info!(
            country = %country,
            invoice_id = %id,
            states = invoice.states.len(),
            "Invoice synced"
        );
        Ok(SyncOutcome::Upserted)
    }
}
