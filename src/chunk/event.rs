//! The DigestEvent type - one completed chunk.

use std::fmt;

use super::ChunkDigest;

/// A completed chunk: where it ended and what it hashed to.
///
/// # Example
///
/// ```
/// use chunksum::{ChunkDigest, DigestEvent};
///
/// let event = DigestEvent::new(7, ChunkDigest::from_slice(&[0xab; 4]));
/// assert_eq!(event.offset, 7);
/// assert_eq!(event.to_string(), "7 abababab");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigestEvent {
    /// Cumulative offset at which the chunk ends (exclusive).
    pub offset: u64,

    /// Digest of the chunk's bytes.
    pub digest: ChunkDigest,
}

impl DigestEvent {
    /// Creates a new event.
    pub fn new(offset: u64, digest: ChunkDigest) -> Self {
        Self { offset, digest }
    }

    /// Splits the event into (offset, digest).
    pub fn into_parts(self) -> (u64, ChunkDigest) {
        (self.offset, self.digest)
    }
}

impl From<(u64, ChunkDigest)> for DigestEvent {
    fn from((offset, digest): (u64, ChunkDigest)) -> Self {
        Self::new(offset, digest)
    }
}

impl fmt::Display for DigestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.offset, self.digest)
    }
}
