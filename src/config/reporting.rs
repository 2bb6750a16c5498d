//! Reporting endpoint credentials

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::adapters::http::BasicAuthCredentials;

use super::error::ValidationError;

/// Basic-auth credentials guarding the invoice reports
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    pub username: SecretString,
    pub password: SecretString,
}

impl ReportingConfig {
    pub fn credentials(&self) -> BasicAuthCredentials {
        BasicAuthCredentials::new(self.username.clone(), self.password.clone())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("REPORTING__USERNAME"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("REPORTING__PASSWORD"));
        }
        Ok(())
    }
}
