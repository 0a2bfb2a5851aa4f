//! # Authentication Module
//!
//! Credential material and request signing for the Dropbox adapter.
//!
//! ## Overview
//!
//! This module owns everything the adapter needs to issue signed requests
//! once the interactive authorization flow (which lives in the host
//! application) has produced an access token pair:
//!
//! - [`Credentials`] - access token, token secret and account name
//! - [`RequestSigner`] - builds the OAuth 1.0a `Authorization` header
//! - [`CredentialStore`] - persists credentials through a
//!   [`SecureStore`](bridge_traits::storage::SecureStore)
//!
//! Token acquisition itself (the browser round-trip) is deliberately not
//! here; the host hands the finished token pair to the adapter.

pub mod credential_store;
pub mod error;
pub mod signer;
pub mod types;

pub use credential_store::CredentialStore;
pub use error::{AuthError, Result};
pub use signer::RequestSigner;
pub use types::Credentials;
