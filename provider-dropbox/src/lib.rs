//! # Dropbox Provider
//!
//! Lets a desktop media player browse a Dropbox account, discover playable
//! audio files and resolve streaming URLs for them.
//!
//! ## Overview
//!
//! This module provides:
//! - Recursive directory traversal over the Dropbox v1 metadata API
//! - Audio filtering by MIME type
//! - Resolution of time-limited direct-download URLs (media API)
//! - Fire-and-forget tag extraction via the host's [`TagReader`]
//! - An on-demand resolver for the playback layer
//!
//! ## Traversal model
//!
//! The walk is a fire-and-forget fan-out: every subdirectory listing and
//! every content resolution is an independent spawned task, nothing joins
//! them, and a failure deep in the tree silently truncates that branch. The
//! [`ScanStats`](stats::ScanStats) counters make every abandoned branch
//! observable without changing that control flow.
//!
//! [`TagReader`]: bridge_traits::tags::TagReader

pub mod error;
pub mod events;
pub mod mime;
pub mod service;
pub mod stats;
pub mod types;

pub use error::{DropboxError, Result};
pub use events::ServiceEvent;
pub use service::{DropboxConfig, DropboxService};
pub use stats::{ScanStats, StatsSnapshot};
pub use types::{FolderListing, MediaLink, MetadataEntry, ResolvedContent};
