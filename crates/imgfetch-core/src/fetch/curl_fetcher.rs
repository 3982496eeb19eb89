//! Blocking GET via libcurl's easy interface.

use std::cell::RefCell;
use std::str;
use std::time::Duration;

use url::Url;

use super::{parse, BodySink, Fetcher, ResponseHeaders};
use crate::config::FetchConfig;
use crate::error::FetchError;

const MAX_REDIRECTS: u32 = 10;

/// [`Fetcher`] backed by a fresh curl easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    user_agent: String,
    timeout: Duration,
}

impl CurlFetcher {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self::new(cfg.user_agent.clone(), cfg.timeout())
    }
}

/// Per-transfer state shared between the curl callbacks.
#[derive(Default)]
struct TransferState {
    headers: Option<ResponseHeaders>,
    abort: Option<FetchError>,
}

/// Status check then sink veto, in that order.
fn accept_headers(headers: &ResponseHeaders, sink: &mut dyn BodySink) -> Result<(), FetchError> {
    if !headers.is_success() {
        return Err(FetchError::Http(headers.status));
    }
    sink.on_headers(headers).map_err(FetchError::Rejected)
}

impl Fetcher for CurlFetcher {
    fn fetch(&mut self, url: &Url, sink: &mut dyn BodySink) -> Result<ResponseHeaders, FetchError> {
        let header_lines: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let state = RefCell::new(TransferState::default());

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.timeout(self.timeout)?;
        easy.useragent(&self.user_agent)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    // Each response in a redirect chain starts with a status line.
                    if parse::parse_status_line(line).is_some() {
                        header_lines.borrow_mut().clear();
                    }
                    header_lines.borrow_mut().push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                let mut st = state.borrow_mut();
                if st.headers.is_none() {
                    let headers = ResponseHeaders::parse(&header_lines.borrow());
                    let verdict = accept_headers(&headers, &mut *sink);
                    st.headers = Some(headers);
                    if let Err(e) = verdict {
                        st.abort = Some(e);
                        return Ok(0);
                    }
                }
                match sink.on_chunk(data) {
                    Ok(()) => Ok(data.len()),
                    Err(r) => {
                        tracing::debug!("aborting transfer: {}", r);
                        st.abort = Some(FetchError::Rejected(r));
                        Ok(0) // abort transfer
                    }
                }
            })?;
            transfer.perform()
        };

        let state = state.into_inner();
        if let Some(err) = state.abort {
            return Err(err);
        }
        performed?;

        let headers = match state.headers {
            Some(h) => h,
            None => {
                // Empty body: the write callback never ran.
                let h = ResponseHeaders::parse(&header_lines.into_inner());
                accept_headers(&h, sink)?;
                h
            }
        };

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }

        Ok(headers)
    }
}
