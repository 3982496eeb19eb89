//! Error and rejection types shared by the pipeline stages.

use std::path::PathBuf;
use thiserror::Error;

/// Policy verdict that stops processing of a single URL.
///
/// The `Display` text is the human-readable reason printed to the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("invalid URL format")]
    InvalidUrl,

    #[error("potentially dangerous file type")]
    DangerousExtension { extension: String },

    #[error("content is HTML, not an image")]
    HtmlContent,

    #[error("declared size {declared} bytes exceeds limit of {limit} bytes")]
    DeclaredTooLarge { declared: u64, limit: u64 },

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("missing content type with nosniff")]
    NoSniffWithoutType,

    #[error("body exceeds limit of {limit} bytes")]
    BodyTooLarge { limit: u64 },

    #[error("duplicate of already-downloaded image")]
    Duplicate { digest: String },
}

impl Rejection {
    /// True for rejections decided from the URL alone, before any request.
    pub fn is_pre_fetch(&self) -> bool {
        matches!(
            self,
            Rejection::InvalidUrl | Rejection::DangerousExtension { .. }
        )
    }
}

/// Failure of a single GET.
#[derive(Debug, Error)]
pub enum FetchError {
    /// libcurl reported an error (timeout, DNS, connection refused, TLS...).
    #[error("{0}")]
    Transport(#[from] curl::Error),

    /// Final response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),

    /// The body sink refused the response; the transfer was aborted.
    #[error("{0}")]
    Rejected(Rejection),
}

/// Errors that abort the whole run rather than a single URL.
#[derive(Debug, Error)]
pub enum ImgFetchError {
    #[error("failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
