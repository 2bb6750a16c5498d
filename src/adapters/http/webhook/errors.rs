//! Webhook error types.
//!
//! Defines the conditions that end a webhook delivery without `200 ok`, with
//! the HTTP status each one maps to. The status drives the provider's
//! redelivery: 4xx is final, 5xx is retried later.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::application::SyncError;
use crate::domain::foundation::ValidationError;

use super::dto::ErrorResponse;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Body is not valid JSON or lacks `event_type`.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A synced event without the reference it needs.
    #[error("Missing reference: {0}")]
    MissingReference(#[from] ValidationError),

    /// Signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Fetch, persist or enqueue failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidPayload(_) | WebhookError::MissingReference(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::Sync(e) => e.status_code(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            WebhookError::InvalidPayload(_) => "INVALID_PAYLOAD",
            WebhookError::MissingReference(_) => "MISSING_REFERENCE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::Sync(SyncError::QueueFull | SyncError::QueueClosed) => "QUEUE_UNAVAILABLE",
            WebhookError::Sync(_) => "SYNC_FAILED",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(self.error_code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use crate::ports::ProviderError;

    #[test]
    fn malformed_requests_map_to_400() {
        assert_eq!(
            WebhookError::InvalidPayload("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::from(ValidationError::empty_field("invoice")).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn invalid_signature_maps_to_401() {
        assert_eq!(WebhookError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn sync_failures_map_to_500() {
        let fetch = WebhookError::from(SyncError::from(ProviderError::Network("x".into())));
        let store = WebhookError::from(SyncError::from(DomainError::database("x")));
        assert_eq!(fetch.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn full_queue_maps_to_503() {
        let err = WebhookError::from(SyncError::QueueFull);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), "QUEUE_UNAVAILABLE");
    }

    #[test]
    fn missing_reference_displays_field() {
        let err = WebhookError::from(ValidationError::empty_field("customer"));
        assert_eq!(
            err.to_string(),
            "Missing reference: Field 'customer' cannot be empty"
        );
    }
}
