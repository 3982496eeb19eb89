//! Filename derivation.
//!
//! Derives a safe local filename from the Content-Disposition header, the URL
//! path, or, failing both, from the content digest and Content-Type.

mod content_disposition;
mod extension;
mod path;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use extension::extension_for_content_type;
pub use path::{filename_from_url_path, url_path_extension};
pub use sanitize::sanitize_filename;

use url::Url;

use crate::config::FetchConfig;
use crate::digest::ContentDigest;
use crate::fetch::ResponseHeaders;

/// Derives the sanitized filename for a fetched image.
///
/// Precedence: Content-Disposition filename, then the URL's final path segment
/// (only if it contains a `.`), then `<prefix>_<digest8><ext>`. The chosen
/// candidate is sanitized; if nothing usable is left the synthesized name is used.
///
/// # Examples
///
/// - `https://example.com/cat.png` → `"cat.png"`
/// - `https://example.com/` with `Content-Disposition: attachment; filename="../x.gif"` → `"x.gif"`
/// - `https://example.com/avatar` with `Content-Type: image/webp` → `"image_1a2b3c4d.webp"`
pub fn derive_filename(
    url: &Url,
    headers: &ResponseHeaders,
    digest: &ContentDigest,
    cfg: &FetchConfig,
) -> String {
    let candidate = headers
        .content_disposition
        .as_deref()
        .and_then(parse_content_disposition_filename)
        .or_else(|| filename_from_url_path(url));

    if let Some(raw) = candidate {
        let sanitized = sanitize_filename(&raw, cfg.max_filename_len);
        if !sanitized.is_empty() && sanitized != "." && sanitized != ".." {
            return sanitized;
        }
        tracing::debug!(candidate = %raw, "filename unusable after sanitizing");
    }

    synthesized_filename(headers.content_type.as_deref(), digest, cfg)
}

/// `<prefix>_<first 8 hex of digest><ext>`, sanitized like any other name.
pub fn synthesized_filename(
    content_type: Option<&str>,
    digest: &ContentDigest,
    cfg: &FetchConfig,
) -> String {
    let ext = extension_for_content_type(content_type.unwrap_or(""));
    let name = format!("{}_{}{}", cfg.filename_prefix, digest.short(), ext);
    sanitize_filename(&name, cfg.max_filename_len)
}
