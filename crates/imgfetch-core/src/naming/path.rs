//! Filename extraction from URL path.

use url::Url;

use super::content_disposition::percent_decode;

/// Returns the final path segment of `url`, percent-decoded, if it looks like a filename.
///
/// The segment is the text after the last `/`, so a trailing slash yields nothing.
/// A segment without a `.` is not treated as a filename.
pub fn filename_from_url_path(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').next()?;
    if segment.is_empty() || !segment.contains('.') {
        return None;
    }
    Some(percent_decode(segment))
}

/// Lowercased extension (without the dot) of the URL's final path segment.
pub fn url_path_extension(url: &Url) -> Option<String> {
    let segment = percent_decode(url.path().rsplit('/').next()?);
    let (_, ext) = segment.rsplit_once('.')?;
    let ext = ext.trim().to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}
