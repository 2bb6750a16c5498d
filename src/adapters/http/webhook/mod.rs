//! HTTP adapter for provider webhooks.
//!
//! - `POST /webhook/denmark` - DK account deliveries
//! - `POST /webhook/sweden` - SE account deliveries
//! - `POST /webhook/norway` - NO account deliveries
//!
//! Every accepted delivery is answered `200 ok`. The country comes from the
//! route, never from the payload.

pub mod dto;
mod errors;
mod handlers;
mod routes;

pub use dto::WebhookPayload;
pub use errors::WebhookError;
pub use handlers::{handle_webhook, WebhookAppState, WebhookSecrets, ACK_BODY};
pub use routes::webhook_routes;
