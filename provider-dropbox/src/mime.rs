//! Audio MIME type filtering

/// MIME types the player can stream from cloud sources.
///
/// Extend this list to admit more formats; call sites only ever go through
/// [`is_supported_audio`].
pub const SUPPORTED_AUDIO_MIME_TYPES: &[&str] = &["audio/ogg", "audio/mpeg"];

/// Whether a remote file's declared MIME type is playable.
pub fn is_supported_audio(mime_type: &str) -> bool {
    SUPPORTED_AUDIO_MIME_TYPES.contains(&mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allow_listed_types() {
        assert!(is_supported_audio("audio/ogg"));
        assert!(is_supported_audio("audio/mpeg"));
    }

    #[test]
    fn test_rejects_other_types() {
        assert!(!is_supported_audio("text/plain"));
        assert!(!is_supported_audio("image/jpeg"));
        assert!(!is_supported_audio("audio/flac"));
        assert!(!is_supported_audio(""));
    }

    #[test]
    fn test_no_prefix_matching() {
        // Exact equality only; parameters or casing are not normalized here
        assert!(!is_supported_audio("audio/ogg; codecs=vorbis"));
        assert!(!is_supported_audio("Audio/Mpeg"));
    }
}
