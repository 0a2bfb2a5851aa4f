//! Secure Credential Persistence
//!
//! Persists the access token pair using the platform secure store
//! (Keychain, Credential Manager, Secret Service).
//!
//! ## Security Features
//!
//! - Token values are never logged or exposed in error messages
//! - Storage goes through the platform `SecureStore` trait
//! - Secure erasure on sign-out

use bridge_traits::storage::SecureStore;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AuthError, Result};
use crate::types::Credentials;

/// Storage key for the single supported account.
const CREDENTIALS_KEY: &str = "dropbox_credentials";

/// Secure storage for the Dropbox token pair.
///
/// Credentials are serialized to JSON and stored under one key; the adapter
/// supports a single account, so no per-profile keying is needed.
///
/// # Example
///
/// ```no_run
/// use core_auth::{CredentialStore, Credentials};
/// use std::sync::Arc;
/// # use bridge_traits::storage::SecureStore;
/// # async fn example(secure_store: Arc<dyn SecureStore>) -> core_auth::Result<()> {
/// let store = CredentialStore::new(secure_store);
///
/// let credentials = Credentials::new("token", "secret", "alice");
/// store.store(&credentials).await?;
///
/// let loaded = store.load().await?;
/// assert!(loaded.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CredentialStore {
    secure_store: Arc<dyn SecureStore>,
}

impl CredentialStore {
    /// Create a new credential store over a platform secure store
    pub fn new(secure_store: Arc<dyn SecureStore>) -> Self {
        Self { secure_store }
    }

    /// Load stored credentials, if any.
    ///
    /// Returns `Ok(None)` when no credentials have been stored yet. A
    /// corrupted entry is treated as absent (and logged), so a damaged
    /// keychain record degrades to "needs re-authorization" instead of a
    /// hard failure.
    pub async fn load(&self) -> Result<Option<Credentials>> {
        let raw = self
            .secure_store
            .get_secret(CREDENTIALS_KEY)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;

        let Some(raw) = raw else {
            debug!("No stored credentials");
            return Ok(None);
        };

        match serde_json::from_slice::<Credentials>(&raw) {
            Ok(credentials) => {
                debug!(account = %credentials.account_name, "Loaded stored credentials");
                Ok(Some(credentials))
            }
            Err(e) => {
                warn!(error = %e, "Stored credentials are unreadable, ignoring");
                Ok(None)
            }
        }
    }

    /// Store credentials, overwriting any previous entry.
    pub async fn store(&self, credentials: &Credentials) -> Result<()> {
        let raw = serde_json::to_vec(credentials)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        self.secure_store
            .set_secret(CREDENTIALS_KEY, &raw)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;

        debug!(account = %credentials.account_name, "Stored credentials");
        Ok(())
    }

    /// Delete stored credentials (sign-out).
    pub async fn clear(&self) -> Result<()> {
        self.secure_store
            .delete_secret(CREDENTIALS_KEY)
            .await
            .map_err(|e| AuthError::SecureStorageUnavailable(e.to_string()))?;

        debug!("Cleared stored credentials");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory secure store for tests.
    #[derive(Default)]
    struct MemorySecureStore {
        secrets: Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl SecureStore for MemorySecureStore {
        async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()> {
            self.secrets
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>> {
            Ok(self.secrets.lock().unwrap().get(key).cloned())
        }

        async fn delete_secret(&self, key: &str) -> BridgeResult<()> {
            self.secrets.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_store_and_load_round_trip() {
        let store = CredentialStore::new(Arc::new(MemorySecureStore::default()));

        let credentials = Credentials::new("token", "secret", "alice");
        store.store(&credentials).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, credentials);
    }

    #[tokio::test]
    async fn test_load_when_empty() {
        let store = CredentialStore::new(Arc::new(MemorySecureStore::default()));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_credentials() {
        let store = CredentialStore::new(Arc::new(MemorySecureStore::default()));

        store
            .store(&Credentials::new("token", "secret", "alice"))
            .await
            .unwrap();
        store.clear().await.unwrap();

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupted_entry_degrades_to_none() {
        let secure_store = Arc::new(MemorySecureStore::default());
        secure_store
            .set_secret(CREDENTIALS_KEY, b"not json")
            .await
            .unwrap();

        let store = CredentialStore::new(secure_store);
        assert!(store.load().await.unwrap().is_none());
    }
}
