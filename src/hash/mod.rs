//! Incremental hash accumulators.
//!
//! The forwarding writer owns exactly one [`Accumulator`] at a time and asks
//! its [`AccumulatorFactory`] for a fresh one at every chunk boundary.
//!
//! - [`Blake3Accumulator`] - BLAKE3 (requires `hash-blake3` feature)
//! - [`DigestAccumulator`] - any RustCrypto `Digest` (requires `hash-digest` feature)

use std::io;

use crate::chunk::ChunkDigest;

#[cfg(feature = "hash-blake3")]
mod blake3;
#[cfg(feature = "hash-digest")]
mod rustcrypto;

#[cfg(feature = "hash-blake3")]
pub use self::blake3::Blake3Accumulator;
#[cfg(feature = "hash-digest")]
pub use self::rustcrypto::DigestAccumulator;

/// A streaming hash over one chunk.
pub trait Accumulator {
    /// Feeds more bytes into the hash.
    fn update(&mut self, data: &[u8]) -> io::Result<()>;

    /// Returns the digest of everything fed so far.
    ///
    /// The writer calls this at most once per chunk that completes
    /// successfully; a chunk whose digest was rejected may be finalized again
    /// on close.
    fn finalize(&self) -> ChunkDigest;
}

/// Produces a fresh [`Accumulator`] for every chunk.
///
/// Any `FnMut() -> A` is a factory, so `Blake3Accumulator::new` can be passed
/// directly.
pub trait AccumulatorFactory {
    /// The accumulator type produced.
    type Accumulator: Accumulator;

    /// Creates an accumulator in its initial state.
    fn new_accumulator(&mut self) -> Self::Accumulator;
}

impl<F, A> AccumulatorFactory for F
where
    F: FnMut() -> A,
    A: Accumulator,
{
    type Accumulator = A;

    fn new_accumulator(&mut self) -> A {
        self()
    }
}
