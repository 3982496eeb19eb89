//! HTTP retrieval.
//!
//! A [`Fetcher`] performs exactly one GET per call and streams the body into a
//! [`BodySink`], which may veto the response from its headers or from the
//! bytes seen so far. The pipeline only depends on the trait, so tests can
//! substitute a scripted fetcher for the network.

mod curl_fetcher;
mod parse;

pub use curl_fetcher::CurlFetcher;

use url::Url;

use crate::error::{FetchError, Rejection};

/// Headers of the final response (after redirects) that the pipeline cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// HTTP status code of the final response.
    pub status: u32,
    /// `Content-Type` value, verbatim.
    pub content_type: Option<String>,
    /// `Content-Length`, if present and numeric. Advisory only.
    pub content_length: Option<u64>,
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
    /// `X-Content-Type-Options` value if present.
    pub content_type_options: Option<String>,
}

impl ResponseHeaders {
    /// Parse raw header lines (status line included) as received on the wire.
    pub fn parse(lines: &[String]) -> Self {
        parse::parse_headers(lines)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Receives a response as it streams in.
pub trait BodySink {
    /// Called once with the final response headers, before any body byte.
    fn on_headers(&mut self, headers: &ResponseHeaders) -> Result<(), Rejection>;

    /// Called for every body chunk, in order.
    fn on_chunk(&mut self, chunk: &[u8]) -> Result<(), Rejection>;
}

/// Capability to GET a URL.
pub trait Fetcher {
    /// Issues a single GET for `url` and streams the body into `sink`.
    ///
    /// Non-2xx responses fail with [`FetchError::Http`] before the sink sees
    /// anything. A sink error aborts the transfer and is returned as
    /// [`FetchError::Rejected`]. No retries.
    fn fetch(&mut self, url: &Url, sink: &mut dyn BodySink) -> Result<ResponseHeaders, FetchError>;
}
