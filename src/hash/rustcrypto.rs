//! Accumulator over any RustCrypto `Digest`.

use std::fmt;
use std::io;

use ::digest::Digest;

use super::Accumulator;
use crate::chunk::ChunkDigest;

/// An accumulator backed by a RustCrypto hash such as `sha2::Sha256`.
///
/// ```
/// use chunksum::{Accumulator, DigestAccumulator};
/// use sha2::Sha256;
///
/// let mut acc = DigestAccumulator::<Sha256>::new();
/// acc.update(b"abc")?;
/// assert_eq!(acc.finalize().len(), 32);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone)]
pub struct DigestAccumulator<D> {
    state: D,
}

impl<D: Digest + Clone> DigestAccumulator<D> {
    /// Creates a new accumulator.
    pub fn new() -> Self {
        Self { state: D::new() }
    }

    /// Convenience method to hash data in one shot.
    pub fn digest(data: &[u8]) -> ChunkDigest {
        ChunkDigest::from_slice(&D::digest(data))
    }
}

impl<D: Digest + Clone> Default for DigestAccumulator<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for DigestAccumulator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestAccumulator")
            .field("algorithm", &std::any::type_name::<D>())
            .finish()
    }
}

impl<D: Digest + Clone> Accumulator for DigestAccumulator<D> {
    fn update(&mut self, data: &[u8]) -> io::Result<()> {
        Digest::update(&mut self.state, data);
        Ok(())
    }

    fn finalize(&self) -> ChunkDigest {
        ChunkDigest::from_slice(&self.state.clone().finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Sha256;

    #[test]
    fn test_matches_one_shot() {
        let mut acc = DigestAccumulator::<Sha256>::new();
        acc.update(b"hello, ").unwrap();
        acc.update(b"world!").unwrap();
        assert_eq!(acc.finalize(), DigestAccumulator::<Sha256>::digest(b"hello, world!"));
    }

    #[test]
    fn test_finalize_does_not_consume_state() {
        let mut acc = DigestAccumulator::<Sha256>::new();
        acc.update(b"abc").unwrap();
        assert_eq!(acc.finalize(), acc.finalize());
        assert_eq!(
            acc.finalize().to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
