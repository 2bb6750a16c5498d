//! Webhook signature verification.
//!
//! The provider signs each webhook as
//! `hex(HMAC-SHA256(webhook_secret, timestamp + id))` and sends the result in
//! the payload's `signature` field.
//!
//! # Security
//!
//! - Comparison is constant-time
//! - Secrets are handled via `secrecy::SecretString`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a webhook signature is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Missing signature")]
    Missing,

    #[error("Invalid signature format (not valid hex)")]
    InvalidFormat,

    #[error("Invalid signature")]
    Mismatch,
}

/// Verifies `signature` against the expected HMAC for `timestamp` and `id`.
pub fn verify_signature(
    secret: &SecretString,
    timestamp: &str,
    id: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    if signature.trim().is_empty() {
        return Err(SignatureError::Missing);
    }
    let provided = hex::decode(signature.trim()).map_err(|_| SignatureError::InvalidFormat)?;
    let expected = compute_signature(secret, timestamp, id);

    if expected.as_slice().ct_eq(provided.as_slice()).unwrap_u8() != 1 {
        tracing::warn!(webhook_id = %id, "Invalid webhook signature");
        return Err(SignatureError::Mismatch);
    }
    Ok(())
}

/// Raw HMAC bytes for a webhook.
pub fn compute_signature(secret: &SecretString, timestamp: &str, id: &str) -> Vec<u8> {
    // new_from_slice only fails for fixed-size keys; HMAC accepts any length.
    let mut mac = match HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return Vec::new(),
    };
    mac.update(timestamp.as_bytes());
    mac.update(id.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::new("webhook_secret_dk".to_string())
    }

    #[test]
    fn accepts_signature_computed_with_same_secret() {
        let sig = hex::encode(compute_signature(&secret(), "2024-01-01T00:00:00Z", "evt_1"));
        assert_eq!(sig.len(), 64);
        assert!(verify_signature(&secret(), "2024-01-01T00:00:00Z", "evt_1", &sig).is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let sig = format!(" {}\n", hex::encode(compute_signature(&secret(), "ts", "id")));
        assert!(verify_signature(&secret(), "ts", "id", &sig).is_ok());
    }

    #[test]
    fn accepts_uppercase_hex() {
        let sig = hex::encode(compute_signature(&secret(), "ts", "id")).to_uppercase();
        assert!(verify_signature(&secret(), "ts", "id", &sig).is_ok());
    }

    #[test]
    fn rejects_signature_for_other_payload() {
        let sig = hex::encode(compute_signature(&secret(), "ts", "evt_1"));
        assert_eq!(
            verify_signature(&secret(), "ts", "evt_2", &sig),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_signature_from_other_secret() {
        let other = SecretString::new("other".to_string());
        let sig = hex::encode(compute_signature(&other, "ts", "id"));
        assert_eq!(
            verify_signature(&secret(), "ts", "id", &sig),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_missing_and_malformed_signatures() {
        assert_eq!(
            verify_signature(&secret(), "ts", "id", ""),
            Err(SignatureError::Missing)
        );
        assert_eq!(
            verify_signature(&secret(), "ts", "id", "zz"),
            Err(SignatureError::InvalidFormat)
        );
        assert_eq!(
            verify_signature(&secret(), "ts", "id", "abc"),
            Err(SignatureError::InvalidFormat)
        );
    }
}
