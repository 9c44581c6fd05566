//! Digest sinks: consumers of completed chunk digests.

use std::collections::HashMap;

use super::{ChunkDigest, DigestEvent};
use crate::error::{BoxError, DigestMismatch};

/// Receives the digest of every completed chunk.
///
/// Returning an error stops the write (or close) that triggered the chunk.
/// Any `FnMut(u64, ChunkDigest) -> Result<(), E>` closure is a digest sink.
pub trait DigestSink {
    /// Called with the cumulative end offset and digest of a chunk.
    fn on_digest(&mut self, offset: u64, digest: ChunkDigest) -> Result<(), BoxError>;
}

impl<F, E> DigestSink for F
where
    F: FnMut(u64, ChunkDigest) -> Result<(), E>,
    E: Into<BoxError>,
{
    fn on_digest(&mut self, offset: u64, digest: ChunkDigest) -> Result<(), BoxError> {
        self(offset, digest).map_err(Into::into)
    }
}

/// A verifying sink that checks each chunk against recorded digests.
///
/// Built from the events of an earlier pass over the same data with the same
/// boundary policy. The first chunk that differs is rejected with a
/// [`DigestMismatch`], which pins the fault to that chunk's offset.
///
/// A stream that stops early on a recorded boundary never produces a bad
/// chunk, so the writer closes cleanly. Check [`ExpectedDigests::is_complete`]
/// after closing to catch truncation.
///
/// # Example
///
/// ```
/// use chunksum::{ChunkDigest, DigestEvent, DigestSink, ExpectedDigests};
///
/// let good = ChunkDigest::from_slice(&[1, 2, 3]);
/// let mut expected: ExpectedDigests = vec![DigestEvent::new(7, good.clone())]
///     .into_iter()
///     .collect();
///
/// assert!(expected.on_digest(7, good).is_ok());
/// assert!(expected.on_digest(14, ChunkDigest::from_slice(&[0])).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExpectedDigests {
    digests: HashMap<u64, ChunkDigest>,
    verified: usize,
}

impl ExpectedDigests {
    /// Creates an empty verifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the expected digest for the chunk ending at `offset`.
    pub fn insert(&mut self, offset: u64, digest: ChunkDigest) {
        self.digests.insert(offset, digest);
    }

    /// Returns the number of recorded chunks.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Returns how many chunks matched so far.
    pub fn verified(&self) -> usize {
        self.verified
    }

    /// Returns true once every recorded chunk has matched.
    ///
    /// Meaningful for a verifier used on a single stream.
    pub fn is_complete(&self) -> bool {
        self.verified == self.digests.len()
    }

    fn check(&mut self, offset: u64, actual: ChunkDigest) -> Result<(), DigestMismatch> {
        match self.digests.get(&offset) {
            Some(expected) if *expected == actual => {
                self.verified += 1;
                Ok(())
            }
            expected => Err(DigestMismatch {
                offset,
                expected: expected.cloned(),
                actual,
            }),
        }
    }
}

impl FromIterator<DigestEvent> for ExpectedDigests {
    fn from_iter<I: IntoIterator<Item = DigestEvent>>(iter: I) -> Self {
        let mut expected = Self::new();
        expected.extend(iter);
        expected
    }
}

impl Extend<DigestEvent> for ExpectedDigests {
    fn extend<I: IntoIterator<Item = DigestEvent>>(&mut self, iter: I) {
        for event in iter {
            self.insert(event.offset, event.digest);
        }
    }
}

impl DigestSink for ExpectedDigests {
    fn on_digest(&mut self, offset: u64, digest: ChunkDigest) -> Result<(), BoxError> {
        self.check(offset, digest).map_err(Into::into)
    }
}

impl DigestSink for &mut ExpectedDigests {
    fn on_digest(&mut self, offset: u64, digest: ChunkDigest) -> Result<(), BoxError> {
        (**self).on_digest(offset, digest)
    }
}
