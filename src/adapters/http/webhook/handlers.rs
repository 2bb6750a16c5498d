//! HTTP handlers for webhook endpoints.
//!
//! A delivery is parsed, optionally signature-checked, classified, and then
//! handed to the sync dispatcher. Unknown event types are acknowledged
//! without any provider call.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use secrecy::SecretString;

use crate::adapters::frisbii::verify_signature;
use crate::application::{Dispatched, SyncDispatcher, SyncJob, SyncOutcome};
use crate::domain::billing::{SyncTarget, WebhookEventKind};
use crate::domain::foundation::Country;

use super::dto::WebhookPayload;
use super::errors::WebhookError;

/// Body returned for every acknowledged delivery.
pub const ACK_BODY: &str = "ok";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Per-country webhook signing secrets. Countries without one skip
/// verification.
#[derive(Clone, Default)]
pub struct WebhookSecrets {
    secrets: HashMap<Country, SecretString>,
}

impl WebhookSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, country: Country, secret: SecretString) -> Self {
        self.secrets.insert(country, secret);
        self
    }

    pub fn get(&self, country: Country) -> Option<&SecretString> {
        self.secrets.get(&country)
    }
}

/// Shared state of the webhook endpoints.
#[derive(Clone)]
pub struct WebhookAppState {
    pub dispatcher: SyncDispatcher,
    pub secrets: Arc<WebhookSecrets>,
}

impl WebhookAppState {
    pub fn new(dispatcher: SyncDispatcher, secrets: WebhookSecrets) -> Self {
        Self {
            dispatcher,
            secrets: Arc::new(secrets),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook/{country} - Sync the resource a delivery refers to.
pub async fn handle_webhook(
    State(state): State<WebhookAppState>,
    country: Country,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookError> {
    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(country = %country, error = %e, "Rejecting malformed webhook body");
        WebhookError::InvalidPayload(e.to_string())
    })?;

    tracing::info!(
        country = %country,
        event_type = %payload.event_type,
        event = payload.reference(),
        invoice_id = payload.invoice.as_deref().unwrap_or("-"),
        customer_handle = payload.customer.as_deref().unwrap_or("-"),
        "Webhook received"
    );

    if let Some(secret) = state.secrets.get(country) {
        verify_signature(
            secret,
            payload.timestamp.as_deref().unwrap_or_default(),
            payload.id.as_deref().unwrap_or_default(),
            payload.signature.as_deref().unwrap_or_default(),
        )
        .map_err(|_| WebhookError::InvalidSignature)?;
    }

    let kind = WebhookEventKind::parse(&payload.event_type);
    let target = SyncTarget::for_event(
        &kind,
        payload.invoice.as_deref(),
        payload.customer.as_deref(),
    )?;

    let Some(target) = target else {
        tracing::info!(
            country = %country,
            event_type = %kind,
            "Ignoring unhandled webhook event type"
        );
        return Ok((StatusCode::OK, ACK_BODY));
    };

    let job = SyncJob::new(country, target);
    let delivery_id = job.delivery_id;
    let dispatched = state.dispatcher.dispatch(job).await.map_err(|e| {
        tracing::error!(
            country = %country,
            delivery_id = %delivery_id,
            error = %e,
            "Webhook sync failed"
        );
        WebhookError::from(e)
    })?;

    match dispatched {
        Dispatched::Enqueued => {
            tracing::debug!(country = %country, delivery_id = %delivery_id, "Webhook queued");
        }
        Dispatched::Completed(SyncOutcome::Upserted) => {}
        Dispatched::Completed(SyncOutcome::NotFound) => {
            tracing::info!(
                country = %country,
                delivery_id = %delivery_id,
                "Webhook acknowledged without write, resource not found"
            );
        }
    }

    Ok((StatusCode::OK, ACK_BODY))
}
