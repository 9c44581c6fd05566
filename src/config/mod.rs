//! Configuration for fixed-stride chunking.
//!
//! - [`StrideConfig`] - Stride and first boundary of a [`FixedStride`] policy
//!
//! # Example
//!
//! ```
//! use chunksum::StrideConfig;
//!
//! // A boundary every 4 KiB, the first one after a 512-byte header
//! let config = StrideConfig::new(4096)?.with_first(512);
//! config.validate()?;
//!
//! # Ok::<(), chunksum::SumError>(())
//! ```

use crate::boundary::FixedStride;
use crate::error::SumError;

/// Default stride (64 KiB).
pub const DEFAULT_STRIDE: u64 = 64 * 1024;

/// Configuration for a fixed-stride boundary policy.
///
/// Boundaries fall at `first`, `first + stride`, `first + 2 * stride`, ...
/// By default `first == stride`.
///
/// # Constraints
///
/// - `stride` must be non-zero
/// - `first` must be non-zero
///
/// # Example
///
/// ```
/// use chunksum::StrideConfig;
///
/// let config = StrideConfig::default();
/// assert_eq!(config.stride(), 64 * 1024);
///
/// let config = StrideConfig::new(7)?;
/// assert_eq!(config.first(), 7);
/// # Ok::<(), chunksum::SumError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrideConfig {
    /// Distance between consecutive boundaries.
    stride: u64,

    /// Offset of the first boundary.
    first: u64,
}

impl StrideConfig {
    /// Creates a configuration with a boundary every `stride` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SumError::InvalidConfig`] if `stride` is zero.
    pub fn new(stride: u64) -> Result<Self, SumError> {
        let config = Self {
            stride,
            first: stride,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the offset of the first boundary.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`StrideConfig::validate`] to check it.
    pub fn with_first(mut self, first: u64) -> Self {
        self.first = first;
        self
    }

    /// Sets the stride.
    ///
    /// Note: This does not validate the configuration, and does not move the
    /// first boundary.
    pub fn with_stride(mut self, stride: u64) -> Self {
        self.stride = stride;
        self
    }

    /// Returns the stride.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Returns the first boundary offset.
    pub fn first(&self) -> u64 {
        self.first
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use chunksum::StrideConfig;
    ///
    /// let config = StrideConfig::default().with_first(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), SumError> {
        if self.stride == 0 {
            return Err(SumError::InvalidConfig {
                message: "stride must be non-zero",
            });
        }
        if self.first == 0 {
            return Err(SumError::InvalidConfig {
                message: "first boundary must be past offset 0",
            });
        }
        Ok(())
    }

    /// Builds the boundary source described by this configuration.
    pub fn boundaries(&self) -> FixedStride {
        FixedStride::from_config(self)
    }
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            first: DEFAULT_STRIDE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundarySource;

    #[test]
    fn test_default_config() {
        let config = StrideConfig::default();
        assert_eq!(config.stride(), DEFAULT_STRIDE);
        assert_eq!(config.first(), DEFAULT_STRIDE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_zero_stride() {
        assert!(StrideConfig::new(0).is_err());
        assert!(StrideConfig::default().with_stride(0).validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = StrideConfig::new(100).unwrap().with_first(30).with_stride(50);
        let mut b = config.boundaries();
        assert_eq!(b.next_boundary(), 30);
        assert_eq!(b.next_boundary(), 80);
    }
}
