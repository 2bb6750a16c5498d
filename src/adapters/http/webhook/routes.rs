//! Axum router configuration for webhook endpoints.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::Router;

use crate::domain::foundation::Country;

use super::handlers::{handle_webhook, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `POST /denmark` - Deliveries from the DK account
/// - `POST /sweden` - Deliveries from the SE account
/// - `POST /norway` - Deliveries from the NO account
///
/// Other methods on these paths answer 405.
pub fn webhook_routes() -> Router<WebhookAppState> {
    Country::ALL
        .into_iter()
        .fold(Router::new(), |router, country| {
            router.route(
                &format!("/{}", country.webhook_slug()),
                post(move |state: State<WebhookAppState>, body: Bytes| {
                    handle_webhook(state, country, body)
                }),
            )
        })
}
