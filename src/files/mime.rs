use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

pub const OCTET_STREAM: &str = "application/octet-stream";

static MIME_TABLE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("txt", "text/plain"),
        ("log", "text/plain"),
        ("conf", "text/plain"),
        ("md", "text/plain"),
        ("sh", "text/x-shellscript"),
        ("html", "text/html"),
        ("htm", "text/html"),
        ("css", "text/css"),
        ("js", "application/javascript"),
        ("json", "application/json"),
        ("xml", "application/xml"),
        ("pdf", "application/pdf"),
        ("zip", "application/zip"),
        ("gz", "application/gzip"),
        ("mp4", "video/mp4"),
        ("mkv", "video/x-matroska"),
        ("avi", "video/x-msvideo"),
        ("mov", "video/quicktime"),
        ("webm", "video/webm"),
        ("mp3", "audio/mpeg"),
        ("wav", "audio/wav"),
        ("ogg", "audio/ogg"),
        ("flac", "audio/flac"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("png", "image/png"),
        ("gif", "image/gif"),
        ("webp", "image/webp"),
        ("svg", "image/svg+xml"),
        ("ico", "image/x-icon"),
    ])
});

/// Content type for a file name, by extension only. Unknown or missing
/// extensions fall back to a generic binary type.
pub fn content_type_for(name: &str) -> &'static str {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .and_then(|e| MIME_TABLE.get(e.as_str()).copied())
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type_for("movie.mp4"), "video/mp4");
        assert_eq!(content_type_for("notes.txt"), "text/plain");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(content_type_for("REPORT.PDF"), "application/pdf");
        assert_eq!(content_type_for("clip.MoV"), "video/quicktime");
    }

    #[test]
    fn unknown_or_missing_extension_is_octet_stream() {
        assert_eq!(content_type_for("archive.xyz"), OCTET_STREAM);
        assert_eq!(content_type_for("Makefile"), OCTET_STREAM);
        assert_eq!(content_type_for(""), OCTET_STREAM);
    }

    #[test]
    fn only_the_last_extension_counts() {
        assert_eq!(content_type_for("backup.tar.gz"), "application/gzip");
    }
}
