//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid provider base URL")]
    InvalidProviderUrl,

    #[error("Provider page size must be between 1 and 100")]
    InvalidPageSize,

    #[error("Sync workers and queue capacity must be positive")]
    InvalidWorkerPool,

    #[error("Sync max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("Backfill page delay must be at least 100ms")]
    PageDelayTooShort,

    #[error("Invalid backfill start date, expected YYYY-MM-DD")]
    InvalidBackfillFrom,
}
