//! Fetch-validate-store pipeline.
//!
//! URLs are processed strictly one after another. Each ends in exactly one
//! [`Outcome`]; only a failure to create the output directory stops the run.

use std::path::PathBuf;

use url::Url;

use crate::config::FetchConfig;
use crate::digest::{ContentDigest, DigestBuilder, InMemoryDigests, SeenDigests};
use crate::error::{FetchError, ImgFetchError, Rejection};
use crate::fetch::{BodySink, Fetcher, ResponseHeaders};
use crate::header_policy::check_headers;
use crate::naming::derive_filename;
use crate::storage;
use crate::url_policy::check_url;

/// A file written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub filename: String,
    pub path: PathBuf,
    pub bytes: u64,
    pub digest: ContentDigest,
}

/// Terminal state of one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written(SavedImage),
    /// Refused by policy: URL syntax, extension, headers, size, or duplicate content.
    Rejected(Rejection),
    /// Transport error or non-2xx status; carries the raw error text.
    NetworkFailed(String),
    /// Content was accepted but could not be stored.
    WriteFailed { filename: String, error: String },
}

impl Outcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Outcome::Written(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::NetworkFailed(_) | Outcome::WriteFailed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlReport {
    pub url: String,
    pub outcome: Outcome,
}

/// Per-URL outcomes of one run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub reports: Vec<UrlReport>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_written()).count()
    }

    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Rejected(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_failure()).count()
    }
}

/// Collects a response body while enforcing header rules and the size ceiling.
struct ImageSink<'a> {
    cfg: &'a FetchConfig,
    body: Vec<u8>,
    digest: DigestBuilder,
}

impl<'a> ImageSink<'a> {
    fn new(cfg: &'a FetchConfig) -> Self {
        Self {
            cfg,
            body: Vec::new(),
            digest: DigestBuilder::new(),
        }
    }

    fn finish(self) -> (Vec<u8>, ContentDigest) {
        (self.body, self.digest.finish())
    }
}

impl BodySink for ImageSink<'_> {
    fn on_headers(&mut self, headers: &ResponseHeaders) -> Result<(), Rejection> {
        check_headers(headers, self.cfg)?;
        if let Some(declared) = headers.content_length {
            self.body.reserve(declared.min(self.cfg.max_bytes) as usize);
        }
        Ok(())
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> Result<(), Rejection> {
        if (self.body.len() + chunk.len()) as u64 > self.cfg.max_bytes {
            return Err(Rejection::BodyTooLarge {
                limit: self.cfg.max_bytes,
            });
        }
        self.body.extend_from_slice(chunk);
        self.digest.update(chunk);
        Ok(())
    }
}

/// Sequential pipeline over a fetcher and a seen-digest set.
pub struct Pipeline<F, S = InMemoryDigests> {
    cfg: FetchConfig,
    fetcher: F,
    seen: S,
}

impl<F: Fetcher> Pipeline<F, InMemoryDigests> {
    pub fn new(cfg: FetchConfig, fetcher: F) -> Self {
        Self::with_seen(cfg, fetcher, InMemoryDigests::new())
    }
}

impl<F: Fetcher, S: SeenDigests> Pipeline<F, S> {
    pub fn with_seen(cfg: FetchConfig, fetcher: F, seen: S) -> Self {
        Self { cfg, fetcher, seen }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.cfg
    }

    pub fn seen(&self) -> &S {
        &self.seen
    }

    pub fn into_parts(self) -> (F, S) {
        (self.fetcher, self.seen)
    }

    /// Processes every URL in order. See [`Pipeline::run_with`].
    pub fn run(&mut self, urls: &[String]) -> Result<RunSummary, ImgFetchError> {
        self.run_with(urls, |_| {})
    }

    /// Processes every URL in order, calling `on_report` as each one finishes.
    ///
    /// An empty list returns immediately without touching the filesystem.
    /// Otherwise the output directory is created first; failing that aborts the run.
    pub fn run_with(
        &mut self,
        urls: &[String],
        mut on_report: impl FnMut(&UrlReport),
    ) -> Result<RunSummary, ImgFetchError> {
        let mut summary = RunSummary::default();
        if urls.is_empty() {
            tracing::info!("no URLs to process");
            return Ok(summary);
        }

        storage::ensure_output_dir(&self.cfg.output_dir)?;
        tracing::info!(
            count = urls.len(),
            output_dir = %self.cfg.output_dir.display(),
            "starting run"
        );

        for url in urls {
            let report = UrlReport {
                url: url.clone(),
                outcome: self.process(url),
            };
            on_report(&report);
            summary.reports.push(report);
        }

        tracing::info!(
            written = summary.written(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "run finished"
        );
        Ok(summary)
    }

    /// Runs one URL through every stage. Expects the output directory to exist.
    pub fn process(&mut self, raw: &str) -> Outcome {
        let url = match check_url(raw, &self.cfg) {
            Ok(u) => u,
            Err(r) => {
                tracing::info!(url = raw, reason = %r, "rejected before fetch");
                return Outcome::Rejected(r);
            }
        };

        let outcome = self.fetch_and_store(&url);
        match &outcome {
            Outcome::Written(img) => tracing::info!(
                url = %url,
                path = %img.path.display(),
                bytes = img.bytes,
                digest = %img.digest,
                "saved image"
            ),
            Outcome::Rejected(r) => tracing::info!(url = %url, reason = %r, "skipped"),
            Outcome::NetworkFailed(e) => tracing::warn!(url = %url, error = %e, "fetch failed"),
            Outcome::WriteFailed { filename, error } => {
                tracing::warn!(url = %url, filename = %filename, error = %error, "write failed")
            }
        }
        outcome
    }

    fn fetch_and_store(&mut self, url: &Url) -> Outcome {
        let mut sink = ImageSink::new(&self.cfg);
        let headers = match self.fetcher.fetch(url, &mut sink) {
            Ok(h) => h,
            Err(FetchError::Rejected(r)) => return Outcome::Rejected(r),
            Err(e) => return Outcome::NetworkFailed(e.to_string()),
        };
        let (body, digest) = sink.finish();

        if body.len() as u64 > self.cfg.max_bytes {
            return Outcome::Rejected(Rejection::BodyTooLarge {
                limit: self.cfg.max_bytes,
            });
        }

        if !self.seen.insert(digest.clone()) {
            return Outcome::Rejected(Rejection::Duplicate {
                digest: digest.to_string(),
            });
        }

        let filename = derive_filename(url, &headers, &digest, &self.cfg);
        match storage::write_image(&self.cfg.output_dir, &filename, &body) {
            Ok(path) => Outcome::Written(SavedImage {
                filename,
                path,
                bytes: body.len() as u64,
                digest,
            }),
            Err(e) => Outcome::WriteFailed {
                filename,
                error: format!("{:#}", e),
            },
        }
    }
}
