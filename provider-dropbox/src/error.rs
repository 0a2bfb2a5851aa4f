//! Error types for the Dropbox provider

use thiserror::Error;

/// Dropbox provider errors
#[derive(Error, Debug)]
pub enum DropboxError {
    /// No credentials are present; the host must run interactive authorization
    #[error("Not authenticated with Dropbox")]
    NotAuthenticated,

    /// API request returned a non-success status
    #[error("Dropbox API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected JSON shape
    #[error("Failed to parse API response: {0}")]
    MalformedResponse(String),

    /// Network/HTTP-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credential handling failed below the signing layer
    #[error("Credential error: {0}")]
    Credential(String),
}

/// Result type for Dropbox operations
pub type Result<T> = std::result::Result<T, DropboxError>;

impl From<bridge_traits::error::BridgeError> for DropboxError {
    fn from(error: bridge_traits::error::BridgeError) -> Self {
        DropboxError::Transport(error.to_string())
    }
}

impl From<core_auth::AuthError> for DropboxError {
    fn from(error: core_auth::AuthError) -> Self {
        match error {
            core_auth::AuthError::NotAuthenticated => DropboxError::NotAuthenticated,
            other => DropboxError::Credential(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DropboxError::Api {
            status: 401,
            message: "Invalid OAuth request".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Dropbox API error (status 401): Invalid OAuth request"
        );
    }

    #[test]
    fn test_auth_error_conversion() {
        let error: DropboxError = core_auth::AuthError::NotAuthenticated.into();
        assert!(matches!(error, DropboxError::NotAuthenticated));
    }
}
