//! OAuth 1.0a Request Signing
//!
//! Builds the `Authorization` header for Dropbox v1 API requests.
//!
//! # Overview
//!
//! Dropbox's v1 API accepts the PLAINTEXT signature method over TLS, so the
//! signature is simply `<consumer_secret>&<token_secret>` — no base-string
//! hashing is involved. The header still carries the standard OAuth
//! parameters (consumer key, token, nonce, timestamp).
//!
//! # Security
//!
//! - Token values are never logged
//! - The nonce is a fresh cryptographically random value per request

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AuthError, Result};
use crate::types::Credentials;

/// Builds `Authorization` header values from stored token material.
///
/// The consumer key pair identifies the application itself and is fixed at
/// construction; the per-account token pair comes in with each call.
///
/// # Examples
///
/// ```
/// use core_auth::{Credentials, RequestSigner};
///
/// let signer = RequestSigner::new("app_key", "app_secret");
/// let credentials = Credentials::new("token", "token_secret", "alice");
/// let header = signer.authorization_header(&credentials).unwrap();
/// assert!(header.starts_with("OAuth "));
/// ```
#[derive(Debug, Clone)]
pub struct RequestSigner {
    consumer_key: String,
    consumer_secret: String,
}

impl RequestSigner {
    /// Create a signer for the given application key pair
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Build the `Authorization` header value for one request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when `credentials` carries no
    /// access token. Any other failure mode surfaces later, as an
    /// authorization error from the API itself.
    pub fn authorization_header(&self, credentials: &Credentials) -> Result<String> {
        if !credentials.is_complete() {
            return Err(AuthError::NotAuthenticated);
        }

        let signature = format!(
            "{}&{}",
            self.consumer_secret, credentials.access_token_secret
        );
        let timestamp = Self::timestamp();
        let nonce = Self::nonce();

        let params = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_token", credentials.access_token.as_str()),
            ("oauth_signature_method", "PLAINTEXT"),
            ("oauth_signature", signature.as_str()),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_nonce", nonce.as_str()),
            ("oauth_version", "1.0"),
        ];

        let joined = params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", joined))
    }

    fn timestamp() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string()
    }

    fn nonce() -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> RequestSigner {
        RequestSigner::new("consumer_key", "consumer_secret")
    }

    #[test]
    fn test_header_contains_oauth_params() {
        let credentials = Credentials::new("my_token", "my_token_secret", "alice");
        let header = signer().authorization_header(&credentials).unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"consumer_key\""));
        assert!(header.contains("oauth_token=\"my_token\""));
        assert!(header.contains("oauth_signature_method=\"PLAINTEXT\""));
        assert!(header.contains("oauth_version=\"1.0\""));
    }

    #[test]
    fn test_plaintext_signature_joins_secrets() {
        let credentials = Credentials::new("token", "token_secret", "alice");
        let header = signer().authorization_header(&credentials).unwrap();

        // "&" percent-encodes to %26 inside the quoted value
        assert!(header.contains("oauth_signature=\"consumer_secret%26token_secret\""));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let result = signer().authorization_header(&Credentials::default());
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn test_nonce_is_fresh_per_request() {
        let credentials = Credentials::new("token", "secret", "alice");
        let signer = signer();
        let first = signer.authorization_header(&credentials).unwrap();
        let second = signer.authorization_header(&credentials).unwrap();
        // Same credentials, different nonce
        assert_ne!(first, second);
    }
}
