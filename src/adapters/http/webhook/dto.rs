//! Request and response types for webhook endpoints.

use serde::{Deserialize, Serialize};

/// Webhook body as posted by the provider.
///
/// Only `event_type` is required. The resource references are checked
/// against the event type once it is classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    pub event_type: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    /// Invoice ID for invoice events.
    #[serde(default)]
    pub invoice: Option<String>,
    /// Customer handle; set on customer events and most invoice events.
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub transaction: Option<String>,
}

impl WebhookPayload {
    /// Identifier used to correlate log lines with the provider's delivery.
    pub fn reference(&self) -> &str {
        self.event_id
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("-")
    }
}

/// Error response for webhook failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_accepts_extra_provider_fields() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "id": "wh_1",
            "event_id": "evt_1",
            "event_type": "invoice_settled",
            "timestamp": "2024-01-01T10:00:00.000Z",
            "signature": "abcd",
            "invoice": "INV-1",
            "customer": "cust-1",
            "transaction": "tx_1",
            "unexpected": { "nested": true }
        }))
        .unwrap();

        assert_eq!(payload.event_type, "invoice_settled");
        assert_eq!(payload.invoice.as_deref(), Some("INV-1"));
        assert_eq!(payload.reference(), "evt_1");
    }

    #[test]
    fn payload_requires_event_type() {
        let result: Result<WebhookPayload, _> =
            serde_json::from_value(json!({ "invoice": "INV-1" }));
        assert!(result.is_err());
    }

    #[test]
    fn reference_falls_back_to_id() {
        let payload = WebhookPayload {
            id: Some("wh_9".to_string()),
            event_type: "x".to_string(),
            ..Default::default()
        };
        assert_eq!(payload.reference(), "wh_9");
    }
}
