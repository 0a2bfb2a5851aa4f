use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth 1.0a access token material for one Dropbox account.
///
/// Empty strings denote "unauthenticated"; [`Credentials::is_complete`]
/// mirrors the check the host performs before starting a scan.
///
/// # Security
///
/// Tokens should never be logged. The `Debug` implementation redacts the
/// token fields; only the account name is printed.
///
/// # Examples
///
/// ```
/// use core_auth::Credentials;
///
/// let credentials = Credentials::new("token", "secret", "user@example.com");
/// assert!(credentials.is_complete());
///
/// let empty = Credentials::default();
/// assert!(!empty.is_complete());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// The OAuth access token used for API requests
    pub access_token: String,
    /// The OAuth access token secret used for signing
    pub access_token_secret: String,
    /// Human-readable account name, for display only
    pub account_name: String,
}

impl Credentials {
    /// Create a new credential set
    pub fn new(
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
            account_name: account_name.into(),
        }
    }

    /// Check whether an access token is present.
    ///
    /// The token secret may legitimately be empty for some grants, so only
    /// the access token decides authenticated-ness.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty()
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("access_token_secret", &"[REDACTED]")
            .field("account_name", &self.account_name)
            .finish()
    }
}
