//! Top-level HTTP router.
//!
//! ```text
//! GET  /health                    liveness, no auth
//! POST /webhook/{denmark|sweden|norway}
//! GET  /invoices                  basic auth
//! GET  /invoices/virtual-office   basic auth
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::middleware::{basic_auth_middleware, BasicAuthCredentials};
use super::reports::{report_routes, ReportsAppState};
use super::webhook::{webhook_routes, WebhookAppState};

/// Assembles every endpoint of the service.
pub fn app_router(
    webhook_state: WebhookAppState,
    reports_state: ReportsAppState,
    credentials: BasicAuthCredentials,
    request_timeout: Duration,
) -> Router {
    let reports = report_routes()
        .route_layer(middleware::from_fn_with_state(
            Arc::new(credentials),
            basic_auth_middleware,
        ))
        .with_state(reports_state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/webhook", webhook_routes().with_state(webhook_state))
        .merge(reports)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::adapters::frisbii::MockBillingProvider;
    use crate::adapters::http::webhook::WebhookSecrets;
    use crate::adapters::memory::InMemoryBillingStore;
    use crate::application::{SyncDispatcher, SyncResourceHandler};

    fn router() -> Router {
        let store = InMemoryBillingStore::new();
        let handler = Arc::new(SyncResourceHandler::new(
            Arc::new(MockBillingProvider::new()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        ));
        app_router(
            WebhookAppState::new(SyncDispatcher::Inline(handler), WebhookSecrets::new()),
            ReportsAppState::new(Arc::new(store)),
            BasicAuthCredentials::new(
                SecretString::new("reports".to_string()),
                SecretString::new("pw".to_string()),
            ),
            Duration::from_secs(5),
        )
    }

    fn request(method: Method, uri: &str, auth: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Basic {}", STANDARD.encode(auth)),
            );
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = router()
            .oneshot(request(Method::GET, "/health", None, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn reports_require_credentials() {
        let uri = "/invoices?from=2024-01-01&to=2024-01-31";

        let anonymous = router().oneshot(request(Method::GET, uri, None, "")).await.unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let authed = router()
            .oneshot(request(Method::GET, uri, Some("reports:pw"), ""))
            .await
            .unwrap();
        assert_eq!(authed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn webhooks_do_not_require_credentials() {
        let response = router()
            .oneshot(request(
                Method::POST,
                "/webhook/denmark",
                None,
                r#"{"event_type":"subscription_created"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_country_path_is_not_found() {
        let response = router()
            .oneshot(request(
                Method::POST,
                "/webhook/finland",
                None,
                r#"{"event_type":"invoice_settled","invoice":"INV-1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
