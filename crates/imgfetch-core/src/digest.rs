//! Content digests (SHA-256) and the per-run set of already-downloaded digests.
//!
//! Bodies are hashed incrementally as chunks arrive, so no second pass over
//! the buffer is needed.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// Lowercase hex SHA-256 of a response body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Digest of a complete byte slice.
    pub fn of(bytes: &[u8]) -> Self {
        let mut b = DigestBuilder::new();
        b.update(bytes);
        b.finish()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 hex characters, used in synthesized filenames.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incremental hasher for streamed bodies.
#[derive(Default)]
pub struct DigestBuilder {
    hasher: Sha256,
}

impl DigestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    pub fn finish(self) -> ContentDigest {
        ContentDigest(hex::encode(self.hasher.finalize()))
    }
}

/// Set of digests already written during this run.
///
/// Swappable so tests (or a future persistent index) can pre-seed or inspect it.
pub trait SeenDigests {
    fn contains(&self, digest: &ContentDigest) -> bool;

    /// Records `digest`. Returns false if it was already present.
    fn insert(&mut self, digest: ContentDigest) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory digest set; reset every run.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDigests {
    seen: HashSet<ContentDigest>,
}

impl InMemoryDigests {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<ContentDigest> for InMemoryDigests {
    fn from_iter<I: IntoIterator<Item = ContentDigest>>(iter: I) -> Self {
        Self {
            seen: iter.into_iter().collect(),
        }
    }
}

impl SeenDigests for InMemoryDigests {
    fn contains(&self, digest: &ContentDigest) -> bool {
        self.seen.contains(digest)
    }

    fn insert(&mut self, digest: ContentDigest) -> bool {
        self.seen.insert(digest)
    }

    fn len(&self) -> usize {
        self.seen.len()
    }
}
