//! Webhook sync dispatch configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::{RetryPolicy, SyncWorkerConfig};

use super::error::ValidationError;

/// Where a webhook's fetch-and-persist runs.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// On the worker pool; the webhook is answered once the job is queued.
    #[default]
    Queued,
    /// Within the webhook request; failures answer 500.
    Inline,
}

/// Sync configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub mode: SyncMode,

    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Attempts per job, first try included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

impl SyncConfig {
    pub fn worker_config(&self) -> SyncWorkerConfig {
        SyncWorkerConfig::default()
            .with_workers(self.workers)
            .with_queue_capacity(self.queue_capacity)
            .with_retry(RetryPolicy {
                max_attempts: self.max_attempts,
                initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.workers == 0 || self.queue_capacity == 0 {
            return Err(ValidationError::InvalidWorkerPool);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mode: SyncMode::default(),
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    500
}
