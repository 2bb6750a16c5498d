//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `PSP_SYNC` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use psp_sync::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod backfill;
mod database;
mod error;
mod provider;
mod reporting;
mod server;
mod sync;

pub use backfill::BackfillConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use provider::ProviderConfig;
pub use reporting::ReportingConfig;
pub use server::{Environment, ServerConfig};
pub use sync::{SyncConfig, SyncMode};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Provider accounts (API keys, webhook secrets)
    pub provider: ProviderConfig,

    /// Reporting endpoint credentials
    pub reporting: ReportingConfig,

    /// Webhook sync dispatch and worker pool
    #[serde(default)]
    pub sync: SyncConfig,

    /// Startup backfill
    #[serde(default)]
    pub backfill: BackfillConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PSP_SYNC` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PSP_SYNC__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PSP_SYNC__PROVIDER__API_KEY_DK=...` -> `provider.api_key_dk = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PSP_SYNC")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.provider.validate()?;
        self.reporting.validate()?;
        self.sync.validate()?;
        self.backfill.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Country;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const REQUIRED: [(&str, &str); 6] = [
        ("PSP_SYNC__DATABASE__URL", "postgresql://test@localhost/billing"),
        ("PSP_SYNC__PROVIDER__API_KEY_DK", "priv_dk"),
        ("PSP_SYNC__PROVIDER__API_KEY_SE", "priv_se"),
        ("PSP_SYNC__PROVIDER__API_KEY_NO", "priv_no"),
        ("PSP_SYNC__REPORTING__USERNAME", "finance"),
        ("PSP_SYNC__REPORTING__PASSWORD", "pw"),
    ];

    const OPTIONAL: [&str; 5] = [
        "PSP_SYNC__SERVER__PORT",
        "PSP_SYNC__SERVER__ENVIRONMENT",
        "PSP_SYNC__SYNC__MODE",
        "PSP_SYNC__BACKFILL__ENABLED",
        "PSP_SYNC__PROVIDER__WEBHOOK_SECRET_NO",
    ];

    fn set_minimal_env() {
        for (key, value) in REQUIRED {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in REQUIRED {
            env::remove_var(key);
        }
        for key in OPTIONAL {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/billing");
        assert_eq!(config.provider.api_key_se.expose_secret(), "priv_se");
        assert_eq!(config.reporting.username.expose_secret(), "finance");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.sync.mode, SyncMode::Queued);
        assert_eq!(config.provider.page_size, 100);
        assert!(!config.backfill.enabled);
    }

    #[test]
    fn test_missing_api_key_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::remove_var("PSP_SYNC__PROVIDER__API_KEY_NO");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_reporting_credentials_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::remove_var("PSP_SYNC__REPORTING__PASSWORD");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PSP_SYNC__SERVER__PORT", "3000");
        env::set_var("PSP_SYNC__SERVER__ENVIRONMENT", "production");
        env::set_var("PSP_SYNC__SYNC__MODE", "inline");
        env::set_var("PSP_SYNC__BACKFILL__ENABLED", "true");
        env::set_var("PSP_SYNC__PROVIDER__WEBHOOK_SECRET_NO", "whsec_no");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.sync.mode, SyncMode::Inline);
        assert!(config.backfill.enabled);
        assert!(config.provider.webhook_secrets().get(Country::No).is_some());
    }
}
