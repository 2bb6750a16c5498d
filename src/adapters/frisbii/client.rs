//! Provider API client.
//!
//! Implements the `BillingProvider` port over the provider's REST API.
//! Each request authenticates with the API key of the account (country) it
//! targets, as HTTP basic auth with an empty password.
//!
//! # Configuration
//!
//! ```ignore
//! let credentials = ProviderCredentials::new(dk_key, se_key, no_key);
//! let client = FrisbiiClient::new(FrisbiiConfig::new(credentials))?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::domain::billing::{Customer, Invoice, ResourceKind};
use crate::domain::foundation::Country;
use crate::ports::{BillingProvider, Page, ProviderError};

use super::mapper::{map_customer, map_invoice};
use super::wire_types::{CustomerResponse, ErrorResponse, InvoiceResponse, ListResponse};

/// Default provider API location.
pub const DEFAULT_API_BASE_URL: &str = "https://api.frisbii.com";

/// One API key per provider account.
#[derive(Clone)]
pub struct ProviderCredentials {
    dk: SecretString,
    se: SecretString,
    no: SecretString,
}

impl ProviderCredentials {
    pub fn new(
        dk: impl Into<String>,
        se: impl Into<String>,
        no: impl Into<String>,
    ) -> Self {
        Self {
            dk: SecretString::new(dk.into()),
            se: SecretString::new(se.into()),
            no: SecretString::new(no.into()),
        }
    }

    /// The API key of `country`'s account.
    pub fn api_key(&self, country: Country) -> &SecretString {
        match country {
            Country::Dk => &self.dk,
            Country::Se => &self.se,
            Country::No => &self.no,
        }
    }
}

/// Provider API configuration.
#[derive(Clone)]
pub struct FrisbiiConfig {
    credentials: ProviderCredentials,

    /// Base URL for the API (default: https://api.frisbii.com).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,

    /// Page size requested from list endpoints.
    page_size: u32,

    /// Lower creation-date bound for list endpoints.
    list_from: Option<NaiveDate>,
}

impl FrisbiiConfig {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self {
            credentials,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            page_size: 100,
            list_from: None,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Only list resources created on or after `from`.
    pub fn with_list_from(mut self, from: Option<NaiveDate>) -> Self {
        self.list_from = from;
        self
    }
}

/// Provider API client.
pub struct FrisbiiClient {
    config: FrisbiiConfig,
    base_url: Url,
    http_client: reqwest::Client,
}

impl FrisbiiClient {
    /// Create a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: FrisbiiConfig) -> Result<Self, ProviderError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ProviderError::Network(format!("invalid base url: {}", e)))?;
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            config,
            base_url,
            http_client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Network("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn list_query(&self, page_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = vec![("size", self.config.page_size.to_string())];
        if let Some(from) = self.config.list_from {
            query.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            query.push(("next_page_token", token.to_string()));
        }
        query
    }

    /// GET `url` and decode a 200 body as `T`.
    ///
    /// `resource` turns a 404 into `NotFound`; without it a 404 is reported
    /// like any other unexpected status.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&'static str, String)],
        country: Country,
        resource: Option<(ResourceKind, &str)>,
    ) -> Result<T, ProviderError> {
        let response = self
            .http_client
            .get(url.clone())
            .query(query)
            .basic_auth(
                self.config.credentials.api_key(country).expose_secret(),
                Option::<&str>::None,
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("read body: {}", e)))?;

        if status == StatusCode::NOT_FOUND {
            if let Some((kind, id)) = resource {
                return Err(ProviderError::not_found(kind, id));
            }
        }

        if status != StatusCode::OK {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.or(e.message))
                .unwrap_or_default();
            tracing::warn!(
                country = %country,
                path = url.path(),
                status = status.as_u16(),
                detail = %detail,
                "Provider returned unexpected status"
            );
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BillingProvider for FrisbiiClient {
    async fn fetch_customer(
        &self,
        handle: &str,
        country: Country,
    ) -> Result<Customer, ProviderError> {
        let url = self.endpoint(&["v1", "customer", handle])?;
        let response: CustomerResponse = self
            .get_json(url, &[], country, Some((ResourceKind::Customer, handle)))
            .await?;
        Ok(map_customer(response))
    }

    async fn fetch_invoice(&self, id: &str, country: Country) -> Result<Invoice, ProviderError> {
        let url = self.endpoint(&["v1", "invoice", id])?;
        let response: InvoiceResponse = self
            .get_json(url, &[], country, Some((ResourceKind::Invoice, id)))
            .await?;
        map_invoice(response, country)
    }

    async fn list_customers(
        &self,
        page_token: Option<&str>,
        country: Country,
    ) -> Result<Page<Customer>, ProviderError> {
        let url = self.endpoint(&["v1", "list", "customer"])?;
        let response: ListResponse<CustomerResponse> = self
            .get_json(url, &self.list_query(page_token), country, None)
            .await?;

        let customers = response.content.into_iter().map(map_customer).collect();
        Ok(Page::new(customers, response.next_page_token))
    }

    async fn list_invoices(
        &self,
        page_token: Option<&str>,
        country: Country,
    ) -> Result<Page<Invoice>, ProviderError> {
        let url = self.endpoint(&["v1", "list", "invoice"])?;
        let response: ListResponse<InvoiceResponse> = self
            .get_json(url, &self.list_query(page_token), country, None)
            .await?;

        let mut invoices = Vec::with_capacity(response.content.len());
        let mut skipped = 0;
        for r in response.content {
            match map_invoice(r, country) {
                Ok(invoice) => invoices.push(invoice),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(country = %country, error = %e, "Skipping listed invoice");
                }
            }
        }
        Ok(Page::new(invoices, response.next_page_token).with_skipped(skipped))
    }
}
