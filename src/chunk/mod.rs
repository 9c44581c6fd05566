//! Chunk digest types.
//!
//! - [`ChunkDigest`] - Finalized digest of one chunk
//! - [`DigestEvent`] - Offset + digest of a completed chunk
//! - [`DigestSink`] - Consumer of completed chunks
//! - [`ExpectedDigests`] - Sink that verifies against a previous pass

mod digest;
mod event;
mod sink;

pub use self::digest::ChunkDigest;
pub use event::DigestEvent;
pub use sink::{DigestSink, ExpectedDigests};
