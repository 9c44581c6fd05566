//! Error types for chunksum.

use std::fmt;
use std::io;

use crate::chunk::ChunkDigest;

/// Boxed error returned by digest sinks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while forwarding and digesting a stream.
///
/// Each variant names the layer that failed, so callers can tell a broken
/// destination apart from a rejected chunk.
#[derive(Debug)]
pub enum SumError {
    /// The destination writer failed. The error is passed through untouched.
    Sink(io::Error),

    /// The hash accumulator refused an update.
    Accumulator(io::Error),

    /// The digest sink rejected the chunk ending at `offset`.
    Rejected {
        /// Cumulative offset of the rejected chunk's end.
        offset: u64,
        /// The error returned by the digest sink.
        source: BoxError,
    },

    /// The boundary source produced an offset that is not past the current
    /// stream position.
    BoundaryNotAhead {
        /// The offending boundary.
        boundary: u64,
        /// Bytes written so far.
        position: u64,
    },

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl SumError {
    /// Returns the chunk offset for a rejected digest.
    pub fn rejected_offset(&self) -> Option<u64> {
        match self {
            SumError::Rejected { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl fmt::Display for SumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SumError::Sink(e) => write!(f, "sink error: {}", e),
            SumError::Accumulator(e) => write!(f, "accumulator error: {}", e),
            SumError::Rejected { offset, source } => {
                write!(f, "digest rejected at offset {}: {}", offset, source)
            }
            SumError::BoundaryNotAhead { boundary, position } => write!(
                f,
                "boundary {} is not past stream position {}",
                boundary, position
            ),
            SumError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for SumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SumError::Sink(e) | SumError::Accumulator(e) => Some(e),
            SumError::Rejected { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for SumError {
    fn from(e: io::Error) -> Self {
        SumError::Sink(e)
    }
}

impl From<SumError> for io::Error {
    fn from(e: SumError) -> Self {
        match e {
            SumError::Sink(e) => e,
            other => io::Error::other(other),
        }
    }
}

/// A write that stopped early.
///
/// `written` counts the bytes that reached the destination before `error`
/// interrupted the call.
#[derive(Debug)]
pub struct PartialWrite {
    /// Bytes forwarded to the destination before the failure.
    pub written: usize,
    /// What stopped the write.
    pub error: SumError,
}

impl PartialWrite {
    /// Discards the partial count and returns the error.
    pub fn into_error(self) -> SumError {
        self.error
    }
}

impl fmt::Display for PartialWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {} bytes)", self.error, self.written)
    }
}

impl std::error::Error for PartialWrite {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Error returned by [`ExpectedDigests`](crate::ExpectedDigests) when a chunk
/// does not match the recorded digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMismatch {
    /// Offset of the chunk end.
    pub offset: u64,
    /// The recorded digest, if one exists for this offset.
    pub expected: Option<ChunkDigest>,
    /// The digest actually computed.
    pub actual: ChunkDigest,
}

impl fmt::Display for DigestMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Some(expected) => write!(
                f,
                "bad sum at {}: expected {}, got {}",
                self.offset, expected, self.actual
            ),
            None => write!(f, "unexpected chunk boundary at {}", self.offset),
        }
    }
}

impl std::error::Error for DigestMismatch {}
