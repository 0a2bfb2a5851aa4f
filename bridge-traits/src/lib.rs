//! # Host Bridge Traits
//!
//! Abstraction seams between the Dropbox adapter core and the host player.
//!
//! ## Overview
//!
//! This crate defines the contract between the adapter and the facilities the
//! host application already owns. Each trait represents a capability the core
//! requires but does not implement itself:
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP request/response primitive
//! - [`SecureStore`](storage::SecureStore) - Credential persistence (Keychain/Keystore)
//! - [`TagReader`](tags::TagReader) - Remote audio tag extraction service
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert their library-specific errors to
//! `BridgeError` and provide actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so implementations can be
//! shared across async tasks.

pub mod error;
pub mod http;
pub mod storage;
pub mod tags;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::SecureStore;
pub use tags::{TagReader, TrackTags};
