//! Errors raised while syncing a single resource.
//!
//! Carries retryability for the worker pool and an HTTP status mapping for
//! inline webhook handling.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::ports::ProviderError;

/// Failure to fetch or persist a resource.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The provider call failed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The store rejected the write.
    #[error("Persistence error: {0}")]
    Persistence(#[from] DomainError),

    /// The sync queue has no free slot.
    #[error("Sync queue is full")]
    QueueFull,

    /// The workers have shut down.
    #[error("Sync queue is closed")]
    QueueClosed,
}

impl SyncError {
    /// Returns true if running the same job again could succeed.
    ///
    /// Network failures, throttling, provider 5xx responses and store
    /// failures are transient. Not-found, other 4xx responses and decode
    /// failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Provider(e) => e.is_retryable(),
            SyncError::Persistence(_) => true,
            SyncError::QueueFull | SyncError::QueueClosed => false,
        }
    }

    /// Maps the error to the status returned to the webhook sender.
    ///
    /// 5xx makes the provider redeliver later.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyncError::Provider(_) | SyncError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SyncError::QueueFull | SyncError::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::ResourceKind;

    #[test]
    fn network_failures_are_retryable() {
        let err = SyncError::from(ProviderError::Network("reset".to_string()));
        assert!(err.is_retryable());
    }

    #[test]
    fn upstream_5xx_and_429_are_retryable() {
        for status in [429, 500, 503] {
            let err = SyncError::from(ProviderError::UnexpectedStatus {
                status,
                body: String::new(),
            });
            assert!(err.is_retryable(), "{}", status);
        }
    }

    #[test]
    fn client_errors_and_not_found_are_not_retryable() {
        let bad_request = SyncError::from(ProviderError::UnexpectedStatus {
            status: 400,
            body: String::new(),
        });
        let not_found = SyncError::from(ProviderError::not_found(ResourceKind::Invoice, "x"));
        let decode = SyncError::from(ProviderError::Decode("eof".to_string()));
        assert!(!bad_request.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(!decode.is_retryable());
    }

    #[test]
    fn persistence_failures_are_retryable() {
        let err = SyncError::from(DomainError::database("connection refused"));
        assert!(err.is_retryable());
    }

    #[test]
    fn fetch_and_persist_failures_map_to_500() {
        let err = SyncError::from(ProviderError::Network("reset".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = SyncError::from(DomainError::database("down"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn queue_pressure_maps_to_503() {
        assert_eq!(SyncError::QueueFull.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(SyncError::QueueClosed.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
