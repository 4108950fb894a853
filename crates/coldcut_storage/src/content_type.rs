//! Content type detection from file extensions.

/// Guess a MIME type from a filename or URL path.
///
/// Falls back to `application/octet-stream` for unknown extensions.
///
/// # Examples
///
/// ```
/// use coldcut_storage::content_type_for;
///
/// assert_eq!(content_type_for("cover.JPG"), "image/jpeg");
/// assert_eq!(content_type_for("show.mp3"), "audio/mpeg");
/// assert_eq!(content_type_for("notes"), "application/octet-stream");
/// ```
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
