//! Parse HTTP response header lines into ResponseHeaders.

use super::ResponseHeaders;

/// Parse collected header lines into ResponseHeaders.
///
/// Header lines from earlier responses in a redirect chain must already have
/// been discarded; a status line encountered here still resets the fields.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(status) = parse_status_line(line) {
            out = ResponseHeaders {
                status,
                ..ResponseHeaders::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                out.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                out.content_length = value.parse::<u64>().ok();
            }
            if name.eq_ignore_ascii_case("content-disposition") {
                out.content_disposition = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("x-content-type-options") {
                out.content_type_options = Some(value.to_string());
            }
        }
    }

    out
}

/// Returns the status code of an `HTTP/x.y NNN reason` line.
pub(crate) fn parse_status_line(line: &str) -> Option<u32> {
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
