//! Integration test: local HTTP server, real curl transfers, files on disk.
//!
//! Serves a mix of good, duplicate, unsafe and failing routes and checks what
//! ends up in the output directory.

mod common;

use common::image_server::{self, Route};
use imgfetch_core::error::Rejection;
use imgfetch_core::{CurlFetcher, FetchConfig, Outcome, Pipeline};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n fake png body";

fn config_in(dir: &Path) -> FetchConfig {
    FetchConfig {
        output_dir: dir.join("Fetched_Images"),
        timeout_secs: 5,
        ..FetchConfig::default()
    }
}

fn pipeline(cfg: &FetchConfig) -> Pipeline<CurlFetcher> {
    Pipeline::new(cfg.clone(), CurlFetcher::from_config(cfg))
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn mixed_batch_writes_one_file_per_unique_image() {
    let server = image_server::start(vec![
        ("/cat.png", Route::ok("image/png", PNG.to_vec())),
        ("/copy/of/cat.png", Route::ok("image/png", PNG.to_vec())),
        ("/page.png", Route::ok("text/html; charset=utf-8", b"<html/>".to_vec())),
        (
            "/download",
            Route::ok("image/gif", b"GIF89a other".to_vec())
                .header("Content-Disposition", "attachment; filename=\"../../evil.gif\""),
        ),
        ("/setup.exe", Route::ok("image/png", b"MZ".to_vec())),
    ]);

    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());
    let urls: Vec<String> = [
        "/cat.png",
        "/copy/of/cat.png",
        "/page.png",
        "/download",
        "/setup.exe",
    ]
    .iter()
    .map(|p| server.url(p))
    .collect();

    let summary = pipeline(&cfg).run(&urls).unwrap();

    assert!(summary.reports[0].outcome.is_written());
    assert!(matches!(
        summary.reports[1].outcome,
        Outcome::Rejected(Rejection::Duplicate { .. })
    ));
    assert_eq!(
        summary.reports[2].outcome,
        Outcome::Rejected(Rejection::HtmlContent)
    );
    assert!(summary.reports[3].outcome.is_written());
    assert!(matches!(
        summary.reports[4].outcome,
        Outcome::Rejected(Rejection::DangerousExtension { .. })
    ));

    assert_eq!(files_in(&cfg.output_dir), vec!["cat.png", "evil.gif"]);
    assert_eq!(fs::read(cfg.output_dir.join("cat.png")).unwrap(), PNG);
    assert!(!tmp.path().join("evil.gif").exists());

    assert_eq!(server.hits("/setup.exe"), 0, ".exe must not be requested");
    assert_eq!(server.hits("/cat.png"), 1);
    assert_eq!(summary.written(), 2);
    assert_eq!(summary.skipped(), 3);
}

#[test]
fn http_error_and_refused_connection_are_network_failures() {
    let server = image_server::start(vec![("/ok.jpg", Route::ok("image/jpeg", b"jpeg".to_vec()))]);
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());
    let urls = vec![
        server.url("/missing.jpg"),
        image_server::refused_url(),
        server.url("/ok.jpg"),
    ];

    let summary = pipeline(&cfg).run(&urls).unwrap();

    assert_eq!(
        summary.reports[0].outcome,
        Outcome::NetworkFailed("HTTP 404".into())
    );
    assert!(matches!(summary.reports[1].outcome, Outcome::NetworkFailed(_)));
    assert!(summary.reports[2].outcome.is_written());
    assert_eq!(files_in(&cfg.output_dir), vec!["ok.jpg"]);
}

#[test]
fn declared_length_over_limit_rejected() {
    let server = image_server::start(vec![("/big.png", Route::ok("image/png", vec![1u8; 5000]))]);
    let tmp = tempdir().unwrap();
    let cfg = FetchConfig {
        max_bytes: 1000,
        ..config_in(tmp.path())
    };

    let summary = pipeline(&cfg).run(&[server.url("/big.png")]).unwrap();

    assert_eq!(
        summary.reports[0].outcome,
        Outcome::Rejected(Rejection::DeclaredTooLarge {
            declared: 5000,
            limit: 1000
        })
    );
    assert!(files_in(&cfg.output_dir).is_empty());
}

#[test]
fn undeclared_oversize_body_aborted_while_streaming() {
    let server = image_server::start(vec![(
        "/stream.png",
        Route::ok("image/png", vec![2u8; 64 * 1024]).without_length(),
    )]);
    let tmp = tempdir().unwrap();
    let cfg = FetchConfig {
        max_bytes: 4096,
        ..config_in(tmp.path())
    };

    let summary = pipeline(&cfg).run(&[server.url("/stream.png")]).unwrap();

    assert_eq!(
        summary.reports[0].outcome,
        Outcome::Rejected(Rejection::BodyTooLarge { limit: 4096 })
    );
    assert!(files_in(&cfg.output_dir).is_empty());
}

#[test]
fn redirect_followed_and_name_synthesized() {
    let server = image_server::start(vec![
        (
            "/avatar",
            Route::status("302 Found").header("Location", "/real/face.webp"),
        ),
        ("/real/face.webp", Route::ok("image/webp", b"hello\n".to_vec())),
    ]);
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());

    let summary = pipeline(&cfg).run(&[server.url("/avatar")]).unwrap();

    assert!(summary.reports[0].outcome.is_written());
    assert_eq!(files_in(&cfg.output_dir), vec!["image_5891b5b5.webp"]);
}

#[test]
fn empty_body_with_image_type_is_written() {
    let server = image_server::start(vec![("/empty.png", Route::ok("image/png", Vec::new()))]);
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());

    let summary = pipeline(&cfg).run(&[server.url("/empty.png")]).unwrap();

    assert!(summary.reports[0].outcome.is_written());
    assert_eq!(fs::read(cfg.output_dir.join("empty.png")).unwrap().len(), 0);
}

#[test]
fn empty_body_html_rejected() {
    let server = image_server::start(vec![("/blank.png", Route::ok("text/html", Vec::new()))]);
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());

    let summary = pipeline(&cfg).run(&[server.url("/blank.png")]).unwrap();

    assert_eq!(
        summary.reports[0].outcome,
        Outcome::Rejected(Rejection::HtmlContent)
    );
}

#[test]
fn configured_user_agent_is_sent() {
    let server = image_server::start(vec![("/ua.png", Route::ok("image/png", PNG.to_vec()))]);
    let tmp = tempdir().unwrap();
    let cfg = FetchConfig {
        user_agent: "imgfetch-test/9.9".into(),
        ..config_in(tmp.path())
    };

    let summary = pipeline(&cfg).run(&[server.url("/ua.png")]).unwrap();

    assert!(summary.reports[0].outcome.is_written());
    assert_eq!(server.user_agents(), vec!["imgfetch-test/9.9".to_string()]);
}

#[test]
fn rejected_urls_never_reach_the_server() {
    let server = image_server::start(vec![
        ("/setup.exe", Route::ok("image/png", b"MZ".to_vec())),
        ("/run.BAT", Route::ok("image/png", b"@echo".to_vec())),
    ]);
    let tmp = tempdir().unwrap();
    let cfg = config_in(tmp.path());
    let urls = vec![
        server.url("/setup.exe"),
        server.url("/run.BAT"),
        "not a url".to_string(),
        "127.0.0.1/cat.png".to_string(),
    ];

    let summary = pipeline(&cfg).run(&urls).unwrap();

    assert!(summary
        .reports
        .iter()
        .all(|r| matches!(r.outcome, Outcome::Rejected(_))));
    assert_eq!(server.total_hits(), 0);
    assert!(server.user_agents().is_empty());
}
