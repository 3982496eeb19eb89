//! Content-Type to file extension mapping for synthesized filenames.

/// Maps a `Content-Type` value to a file extension (with dot).
///
/// Substring match, case-insensitive; unknown types map to `.bin`.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    let ct = content_type.to_ascii_lowercase();
    const TABLE: [(&[&str], &str); 7] = [
        (&["jpeg", "jpg"], ".jpg"),
        (&["png"], ".png"),
        (&["gif"], ".gif"),
        (&["webp"], ".webp"),
        (&["bmp"], ".bmp"),
        (&["tiff"], ".tiff"),
        (&["svg+xml"], ".svg"),
    ];
    TABLE
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| ct.contains(n)))
        .map(|(_, ext)| *ext)
        .unwrap_or(".bin")
}
