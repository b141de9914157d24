//! File-format name constants accepted by the ingestion endpoints.

/// Container formats accepted for video content.
pub const VIDEO_FILE_FORMATS: &[&str] = &[
    "mp4", "m4v", "mkv", "mov", "ts", "wmv", "mpeg", "mxf", "mts", "avi", "webm", "hls",
];

/// Container formats accepted for audio content.
pub const AUDIO_FILE_FORMATS: &[&str] = &["mp3", "aac", "m4a", "wav", "hls"];

/// Formats accepted for image content.
pub const IMAGE_FILE_FORMATS: &[&str] = &["jpg", "jpeg", "png", "gif", "tif", "tga"];

/// Returns `true` if the format name appears in any of the accepted lists.
pub fn is_known_file_format(format: &str) -> bool {
    VIDEO_FILE_FORMATS.contains(&format)
        || AUDIO_FILE_FORMATS.contains(&format)
        || IMAGE_FILE_FORMATS.contains(&format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats_are_recognised() {
        assert!(is_known_file_format("mp4"));
        assert!(is_known_file_format("aac"));
        assert!(is_known_file_format("png"));
    }

    #[test]
    fn unknown_formats_are_rejected() {
        assert!(!is_known_file_format("exe"));
        assert!(!is_known_file_format(""));
        assert!(!is_known_file_format("MP4"));
    }
}
