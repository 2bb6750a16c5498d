//! Provider API configuration (one account per country)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::frisbii::{FrisbiiConfig, ProviderCredentials, DEFAULT_API_BASE_URL};
use crate::adapters::http::WebhookSecrets;
use crate::domain::foundation::Country;

use super::error::ValidationError;

/// Provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API key of the Danish account
    pub api_key_dk: SecretString,

    /// API key of the Swedish account
    pub api_key_se: SecretString,

    /// API key of the Norwegian account
    pub api_key_no: SecretString,

    /// Webhook signing secrets; deliveries for a country without one are
    /// accepted unsigned
    #[serde(default)]
    pub webhook_secret_dk: Option<SecretString>,
    #[serde(default)]
    pub webhook_secret_se: Option<SecretString>,
    #[serde(default)]
    pub webhook_secret_no: Option<SecretString>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Records per list page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client configuration for these accounts.
    pub fn client_config(&self) -> FrisbiiConfig {
        let credentials = ProviderCredentials::new(
            self.api_key_dk.expose_secret().clone(),
            self.api_key_se.expose_secret().clone(),
            self.api_key_no.expose_secret().clone(),
        );
        FrisbiiConfig::new(credentials)
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
            .with_page_size(self.page_size)
    }

    pub fn webhook_secrets(&self) -> WebhookSecrets {
        [
            (Country::Dk, &self.webhook_secret_dk),
            (Country::Se, &self.webhook_secret_se),
            (Country::No, &self.webhook_secret_no),
        ]
        .into_iter()
        .filter_map(|(country, secret)| {
            secret
                .as_ref()
                .filter(|s| !s.expose_secret().is_empty())
                .map(|s| (country, s.clone()))
        })
        .fold(WebhookSecrets::new(), |secrets, (country, secret)| {
            secrets.with_secret(country, secret)
        })
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key_dk.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER__API_KEY_DK"));
        }
        if self.api_key_se.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER__API_KEY_SE"));
        }
        if self.api_key_no.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER__API_KEY_NO"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.page_size == 0 || self.page_size > 100 {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}
