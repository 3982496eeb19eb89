//! URL safety filter: syntax check and dangerous-extension deny-list.
//!
//! Both checks look only at the URL string; nothing here touches the network.

use url::Url;

use crate::config::FetchConfig;
use crate::error::Rejection;
use crate::naming::url_path_extension;

/// Parses and vets a candidate URL.
///
/// Rejects with [`Rejection::InvalidUrl`] unless the URL has a scheme and a host,
/// and with [`Rejection::DangerousExtension`] if the path's extension is on the
/// deny-list (case-insensitive), regardless of what the server would answer.
pub fn check_url(raw: &str, cfg: &FetchConfig) -> Result<Url, Rejection> {
    let url = Url::parse(raw.trim()).map_err(|_| Rejection::InvalidUrl)?;
    if url.scheme().is_empty() || url.host_str().map_or(true, str::is_empty) {
        return Err(Rejection::InvalidUrl);
    }

    if let Some(ext) = url_path_extension(&url) {
        if cfg
            .denied_extensions
            .iter()
            .any(|d| d.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        {
            return Err(Rejection::DangerousExtension { extension: ext });
        }
    }

    Ok(url)
}
