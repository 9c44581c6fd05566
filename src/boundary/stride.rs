//! Built-in boundary policies.

use super::BoundarySource;
use crate::config::StrideConfig;

/// Boundaries at `first`, `first + stride`, `first + 2 * stride`, ...
///
/// Saturates at `u64::MAX`, which no stream reaches.
///
/// # Example
///
/// ```
/// use chunksum::{BoundarySource, FixedStride};
///
/// let mut every7 = FixedStride::new(7);
/// assert_eq!(every7.next_boundary(), 7);
/// assert_eq!(every7.next_boundary(), 14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStride {
    next: u64,
    stride: u64,
}

impl FixedStride {
    /// Creates a policy with a boundary every `stride` bytes, starting at `stride`.
    ///
    /// A zero stride yields the same offset forever; use
    /// [`StrideConfig::new`] to have it rejected up front.
    pub const fn new(stride: u64) -> Self {
        Self {
            next: stride,
            stride,
        }
    }

    /// Creates a policy from a validated configuration.
    pub fn from_config(config: &StrideConfig) -> Self {
        Self {
            next: config.first(),
            stride: config.stride(),
        }
    }

    /// Returns the stride in bytes.
    pub fn stride(&self) -> u64 {
        self.stride
    }
}

impl BoundarySource for FixedStride {
    fn next_boundary(&mut self) -> u64 {
        let boundary = self.next;
        self.next = self.next.saturating_add(self.stride);
        boundary
    }
}

/// Boundaries taken from an iterator of offsets.
///
/// Once the iterator is exhausted every further call yields `u64::MAX`, so the
/// rest of the stream becomes one trailing chunk.
///
/// # Example
///
/// ```
/// use chunksum::{BoundarySource, IterBoundaries};
///
/// let mut b = IterBoundaries::new([4, 10]);
/// assert_eq!(b.next_boundary(), 4);
/// assert_eq!(b.next_boundary(), 10);
/// assert_eq!(b.next_boundary(), u64::MAX);
/// ```
#[derive(Debug, Clone)]
pub struct IterBoundaries<I> {
    iter: I,
}

impl<I: Iterator<Item = u64>> IterBoundaries<I> {
    /// Wraps anything that iterates over offsets.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }
}

impl<I: Iterator<Item = u64>> BoundarySource for IterBoundaries<I> {
    fn next_boundary(&mut self) -> u64 {
        self.iter.next().unwrap_or(u64::MAX)
    }
}
