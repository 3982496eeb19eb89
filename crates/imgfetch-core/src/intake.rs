//! URL intake: turn free-form user text into an ordered list of candidate URLs.

use std::collections::HashSet;
use std::io::{self, BufRead};

/// Line that terminates interactive batch input.
pub const DONE_MARKER: &str = "done";

/// Splits free text on whitespace and commas into candidate URL strings.
///
/// Empty pieces are dropped and exact duplicates removed, keeping the first occurrence.
/// Nothing is validated here; that is the URL policy's job.
pub fn parse_url_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(*s))
        .map(str::to_string)
        .collect()
}

/// Reads lines until one equal to `done` (after trimming) or EOF.
///
/// Returns the collected text without the terminating line.
pub fn read_until_done<R: BufRead>(reader: R) -> io::Result<String> {
    let mut out = String::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim() == DONE_MARKER {
            break;
        }
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}
