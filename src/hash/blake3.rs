//! BLAKE3-based chunk accumulator.

use std::io;

use super::Accumulator;
use crate::chunk::ChunkDigest;

/// An accumulator that computes BLAKE3 digests.
#[derive(Debug, Clone)]
pub struct Blake3Accumulator {
    state: blake3::Hasher,
}

impl Blake3Accumulator {
    /// Creates a new accumulator.
    pub fn new() -> Self {
        Self {
            state: blake3::Hasher::new(),
        }
    }

    /// Creates a new accumulator with a key for keyed hashing.
    pub fn new_keyed(key: &[u8; 32]) -> Self {
        Self {
            state: blake3::Hasher::new_keyed(key),
        }
    }

    /// Convenience method to hash data in one shot.
    pub fn digest(data: &[u8]) -> ChunkDigest {
        ChunkDigest::from_slice(blake3::hash(data).as_bytes())
    }
}

impl Default for Blake3Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for Blake3Accumulator {
    fn update(&mut self, data: &[u8]) -> io::Result<()> {
        self.state.update(data);
        Ok(())
    }

    fn finalize(&self) -> ChunkDigest {
        ChunkDigest::from_slice(self.state.finalize().as_bytes())
    }
}
