//! Dropbox v1 API response types
//!
//! Data structures for deserializing metadata and media endpoint responses.

use serde::{Deserialize, Serialize};

/// One item of a directory listing.
///
/// A trimmed view of the v1 metadata entry — only the fields the traversal
/// classifies on. Entries are transient: parsed, classified and dropped (or
/// moved into the task that resolves them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Absolute remote path, e.g. `/music/album/track.mp3`
    pub path: String,

    /// Whether this entry is a directory
    #[serde(default)]
    pub is_dir: bool,

    /// MIME type (empty for directories)
    #[serde(default)]
    pub mime_type: String,

    /// File size in bytes (0 for directories)
    #[serde(default)]
    pub bytes: u64,
}

impl MetadataEntry {
    /// Last path component, for display.
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Metadata endpoint response for a directory.
///
/// `contents` is deliberately required: a response without it is malformed
/// and the whole listing is abandoned, rather than treated as empty.
#[derive(Debug, Deserialize)]
pub struct FolderListing {
    /// Entries directly under the requested path
    pub contents: Vec<MetadataEntry>,
}

/// Media endpoint response: a time-limited direct-download link.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaLink {
    /// Direct-download URL for the file content
    pub url: String,

    /// Expiry timestamp, as reported by the API
    #[serde(default)]
    pub expires: Option<String>,
}

/// A discovered audio file resolved to a playable URL.
///
/// Combines the direct link with the originating entry's cached metadata —
/// the media response itself carries none of it.
#[derive(Debug, Clone)]
pub struct ResolvedContent {
    /// Time-limited direct-download URL
    pub url: String,
    /// Display name (last path component of the entry)
    pub filename: String,
    /// Size reported by the directory listing
    pub size_bytes: u64,
    /// MIME type reported by the directory listing
    pub mime_type: String,
}

impl ResolvedContent {
    /// Combine a media link with the entry it was resolved for.
    pub fn from_entry(entry: &MetadataEntry, url: String) -> Self {
        Self {
            url,
            filename: entry.filename().to_string(),
            size_bytes: entry.bytes,
            mime_type: entry.mime_type.clone(),
        }
    }
}
