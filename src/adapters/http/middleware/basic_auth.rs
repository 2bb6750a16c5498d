//! HTTP basic authentication for the reporting endpoints.
//!
//! ```text
//! Authorization: Basic base64(username:password)
//! ```
//!
//! Username and password are both checked, each in constant time. Any
//! failure answers 401 with a `WWW-Authenticate` challenge so browsers
//! prompt for credentials.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Challenge sent with every 401.
pub const BASIC_AUTH_CHALLENGE: &str = "Basic realm=\"Restricted\"";

/// The single username/password pair allowed to read reports.
#[derive(Clone)]
pub struct BasicAuthCredentials {
    username: SecretString,
    password: SecretString,
}

impl BasicAuthCredentials {
    pub fn new(username: SecretString, password: SecretString) -> Self {
        Self { username, password }
    }

    /// Checks a decoded `username:password` pair.
    ///
    /// Both halves are always compared so the time taken does not reveal
    /// which one was wrong.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = secure_eq(username, self.username.expose_secret());
        let pass_ok = secure_eq(password, self.password.expose_secret());
        bool::from(user_ok & pass_ok)
    }
}

/// Middleware state.
pub type BasicAuthState = Arc<BasicAuthCredentials>;

/// Rejects requests without valid basic-auth credentials.
pub async fn basic_auth_middleware(
    State(credentials): State<BasicAuthState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(decode_basic)
        .map(|(user, pass)| credentials.verify(&user, &pass))
        .unwrap_or(false);

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "Rejected report request, bad credentials");
        return unauthorized();
    }

    next.run(request).await
}

/// Splits a `Basic` header value into username and password.
fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

// Hashing first makes the comparison independent of input length.
fn secure_eq(provided: &str, expected: &str) -> subtle::Choice {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided.as_slice().ct_eq(expected.as_slice())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, BASIC_AUTH_CHALLENGE)],
        Json(serde_json::json!({
            "error": "Authentication required",
            "code": "UNAUTHENTICATED"
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn credentials() -> BasicAuthState {
        Arc::new(BasicAuthCredentials::new(
            SecretString::new("reports".to_string()),
            SecretString::new("s3cret".to_string()),
        ))
    }

    fn app() -> Router {
        Router::new()
            .route("/invoices", get(|| async { "rows" }))
            .layer(middleware::from_fn_with_state(credentials(), basic_auth_middleware))
    }

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    async fn status_with(auth: Option<String>) -> (StatusCode, Option<String>) {
        let mut builder = HttpRequest::builder().uri("/invoices");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .map(|v| v.to_str().unwrap().to_string());
        (response.status(), challenge)
    }

    #[tokio::test]
    async fn valid_credentials_pass_through() {
        let (status, challenge) = status_with(Some(basic("reports", "s3cret"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(challenge.is_none());
    }

    #[tokio::test]
    async fn missing_header_is_challenged() {
        let (status, challenge) = status_with(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(challenge.as_deref(), Some(BASIC_AUTH_CHALLENGE));
    }

    #[tokio::test]
    async fn wrong_username_or_password_is_rejected() {
        for auth in [basic("reports", "wrong"), basic("admin", "s3cret"), basic("", "")] {
            let (status, _) = status_with(Some(auth)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn malformed_header_is_rejected() {
        for auth in ["Bearer abc", "Basic !!!", "Basic cmVwb3J0cw=="] {
            let (status, _) = status_with(Some(auth.to_string())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{auth}");
        }
    }

    #[test]
    fn password_may_contain_colons() {
        let header = basic("reports", "a:b:c");
        assert_eq!(
            decode_basic(&header),
            Some(("reports".to_string(), "a:b:c".to_string()))
        );
    }
}
