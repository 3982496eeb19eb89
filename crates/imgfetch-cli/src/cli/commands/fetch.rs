//! `imgfetch fetch [URL...]` – fetch, validate and store images.

use anyhow::{Context, Result};
use imgfetch_core::intake::{parse_url_list, read_until_done};
use imgfetch_core::{CurlFetcher, FetchConfig, Outcome, Pipeline, UrlReport};
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct FetchOverrides {
    pub output_dir: Option<PathBuf>,
    pub max_bytes: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl FetchOverrides {
    pub fn apply(self, mut cfg: FetchConfig) -> FetchConfig {
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if let Some(n) = self.max_bytes {
            cfg.max_bytes = n;
        }
        if let Some(s) = self.timeout_secs {
            cfg.timeout_secs = s;
        }
        cfg
    }
}

pub fn run_fetch(cfg: FetchConfig, args: &[String]) -> Result<()> {
    let urls = if args.is_empty() {
        prompt_for_urls()?
    } else {
        parse_url_list(&args.join(" "))
    };

    if urls.is_empty() {
        println!("No URLs provided. Nothing to fetch.");
        return Ok(());
    }

    println!("Fetching {} URL(s) into '{}'", urls.len(), cfg.output_dir.display());
    let fetcher = CurlFetcher::from_config(&cfg);
    let mut pipeline = Pipeline::new(cfg, fetcher);

    let summary = pipeline.run_with(&urls, |report| println!("{}", describe_report(report)))?;

    println!();
    println!(
        "Done: {} saved, {} skipped, {} failed.",
        summary.written(),
        summary.skipped(),
        summary.failed()
    );
    if summary.written() > 0 {
        let dir = &pipeline.config().output_dir;
        let shown = dir.canonicalize().unwrap_or_else(|_| dir.clone());
        println!("Images are in {}", shown.display());
    }
    Ok(())
}

fn prompt_for_urls() -> Result<Vec<String>> {
    println!("Enter image URLs separated by spaces, commas or new lines.");
    println!("Type 'done' on a line by itself to start fetching:");
    io::stdout().flush().context("flush stdout")?;
    let text = read_until_done(io::stdin().lock()).context("read URLs from stdin")?;
    Ok(parse_url_list(&text))
}

/// One console line per finished URL.
pub fn describe_report(report: &UrlReport) -> String {
    match &report.outcome {
        Outcome::Written(img) => format!(
            "✓ Saved {} ({} bytes) from {}",
            img.filename, img.bytes, report.url
        ),
        Outcome::Rejected(reason) => format!("✗ Skipped {}: {}", report.url, reason),
        Outcome::NetworkFailed(err) => format!("✗ Could not fetch {}: {}", report.url, err),
        Outcome::WriteFailed { filename, error } => {
            format!("✗ Could not save {} from {}: {}", filename, report.url, error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgfetch_core::digest::ContentDigest;
    use imgfetch_core::pipeline::SavedImage;
    use imgfetch_core::Rejection;

    fn report(outcome: Outcome) -> UrlReport {
        UrlReport {
            url: "https://example.com/cat.png".into(),
            outcome,
        }
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let base = FetchConfig::default();
        let cfg = FetchOverrides {
            output_dir: Some(PathBuf::from("/tmp/out")),
            max_bytes: None,
            timeout_secs: Some(5),
        }
        .apply(base.clone());
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cfg.max_bytes, base.max_bytes);
        assert_eq!(cfg.timeout_secs, 5);
    }

    #[test]
    fn describe_written() {
        let line = describe_report(&report(Outcome::Written(SavedImage {
            filename: "cat.png".into(),
            path: PathBuf::from("Fetched_Images/cat.png"),
            bytes: 42,
            digest: ContentDigest::of(b"x"),
        })));
        assert_eq!(line, "✓ Saved cat.png (42 bytes) from https://example.com/cat.png");
    }

    #[test]
    fn describe_rejections_and_failures() {
        assert_eq!(
            describe_report(&report(Outcome::Rejected(Rejection::Duplicate {
                digest: "ab".into()
            }))),
            "✗ Skipped https://example.com/cat.png: duplicate of already-downloaded image"
        );
        assert_eq!(
            describe_report(&report(Outcome::NetworkFailed("HTTP 500".into()))),
            "✗ Could not fetch https://example.com/cat.png: HTTP 500"
        );
        assert!(describe_report(&report(Outcome::WriteFailed {
            filename: "cat.png".into(),
            error: "permission denied".into(),
        }))
        .ends_with("permission denied"));
    }
}
