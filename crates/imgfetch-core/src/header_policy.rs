//! Header safety check, applied before any body byte is accepted.

use crate::config::FetchConfig;
use crate::error::Rejection;
use crate::fetch::ResponseHeaders;

/// Applies the header rules in order; the first failing rule decides.
///
/// 1. HTML content type (that does not also mention `image`)
/// 2. Declared `Content-Length` above the size ceiling
/// 3. Content type present but not on the allow-list
/// 4. `X-Content-Type-Options: nosniff` with no content type
///
/// The declared length is advisory; the pipeline still counts real bytes.
pub fn check_headers(headers: &ResponseHeaders, cfg: &FetchConfig) -> Result<(), Rejection> {
    let content_type = headers
        .content_type
        .as_deref()
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if content_type.contains("text/html") && !content_type.contains("image") {
        return Err(Rejection::HtmlContent);
    }

    if let Some(declared) = headers.content_length {
        if declared > cfg.max_bytes {
            return Err(Rejection::DeclaredTooLarge {
                declared,
                limit: cfg.max_bytes,
            });
        }
    }

    if !content_type.is_empty() && !is_allowed_type(&content_type, cfg) {
        return Err(Rejection::UnsupportedContentType(content_type));
    }

    let nosniff = headers
        .content_type_options
        .as_deref()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("nosniff"));
    if nosniff && content_type.is_empty() {
        return Err(Rejection::NoSniffWithoutType);
    }

    Ok(())
}

/// Compares the media type (parameters stripped) against the allow-list.
fn is_allowed_type(content_type: &str, cfg: &FetchConfig) -> bool {
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    cfg.allowed_content_types
        .iter()
        .any(|allowed| allowed.trim().eq_ignore_ascii_case(media_type))
}
