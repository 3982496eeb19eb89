pub mod config;
pub mod logging;

pub mod digest;
pub mod error;
pub mod fetch;
pub mod header_policy;
pub mod intake;
pub mod naming;
pub mod pipeline;
pub mod storage;
pub mod url_policy;

pub use config::FetchConfig;
pub use error::{FetchError, ImgFetchError, Rejection};
pub use fetch::{CurlFetcher, Fetcher};
pub use pipeline::{Outcome, Pipeline, RunSummary, UrlReport};
