//! Remote Tag Extraction Service
//!
//! Seam to the host player's tag reader, which streams a remote file and
//! extracts its audio tags. The adapter only forwards resolved URLs to it and
//! logs what comes back; it never consumes the tags itself.

use async_trait::async_trait;

use crate::error::Result;

/// Tags extracted from an audio stream.
///
/// A trimmed view of what a full tag reader produces — only the fields a
/// library listing displays. All fields are optional because remote streams
/// are routinely untagged or partially tagged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTags {
    /// Track title
    pub title: Option<String>,
    /// Primary artist
    pub artist: Option<String>,
    /// Album name
    pub album: Option<String>,
    /// Track number on album
    pub track_number: Option<u32>,
    /// Release year
    pub year: Option<i32>,
    /// Duration in milliseconds, when the reader could determine it
    pub duration_ms: Option<u64>,
}

/// Remote tag extraction trait
///
/// Implemented by the host player (in the original desktop application this
/// is a separate tag-reader process reached over IPC). The reader fetches the
/// time-limited `url`, parses the stream's tags and returns them.
#[async_trait]
pub trait TagReader: Send + Sync {
    /// Read tags from a remote audio file.
    ///
    /// * `url` - time-limited direct-download URL for the file content
    /// * `filename` - display name of the file (no directory components)
    /// * `size_bytes` - size reported by the remote listing
    /// * `mime_type` - MIME type reported by the remote listing
    async fn read_cloud_file(
        &self,
        url: &str,
        filename: &str,
        size_bytes: u64,
        mime_type: &str,
    ) -> Result<TrackTags>;
}
