//! Boundary sources: where chunks end.
//!
//! - [`BoundarySource`] - Lazily yields strictly increasing cumulative offsets
//! - [`FixedStride`] - A boundary every `stride` bytes
//! - [`IterBoundaries`] - Boundaries taken from any iterator

mod stride;

pub use stride::{FixedStride, IterBoundaries};

/// Yields the next cumulative chunk boundary.
///
/// Called once when the writer is built and once after every boundary the
/// writer reaches. Each value must be greater than the previous one; a value
/// at or behind the current stream position makes the next write fail with
/// [`SumError::BoundaryNotAhead`](crate::SumError::BoundaryNotAhead).
///
/// Any `FnMut() -> u64` closure is a boundary source.
pub trait BoundarySource {
    /// Returns the next boundary offset.
    fn next_boundary(&mut self) -> u64;
}

impl<F> BoundarySource for F
where
    F: FnMut() -> u64,
{
    fn next_boundary(&mut self) -> u64 {
        self()
    }
}
