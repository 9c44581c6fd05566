//! chunksum
//!
//! Streaming, chunked, incremental hashing for Rust writers.
//!
//! `chunksum` wraps a destination writer. Every byte written is forwarded
//! unmodified, and hashed along the way. At caller-chosen cumulative offsets
//! ("boundaries") the digest of the chunk just completed is handed to a
//! callback and hashing restarts. On close, the trailing partial chunk gets
//! its digest too. It is a small, composable primitive for:
//!
//! - per-chunk integrity records while copying or uploading
//! - verifying a stream against digests recorded earlier, and pinning a
//!   corruption to the chunk that contains it
//! - resumable transfers that need checkpoints
//!
//! The crate intentionally:
//! - does NOT pick a hash (bring an [`Accumulator`], or use a built-in one)
//! - does NOT pick boundaries (bring a [`BoundarySource`])
//! - does NOT buffer, retry, or spawn anything
//! - does NOT flush or close the destination on [`HashingWriter::close`]
//!
//! It only does one thing: **Write bytes → forward bytes + chunk digests**
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use std::io;
//! use chunksum::{Blake3Accumulator, ChunkDigest, FixedStride, HashingWriter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut input = File::open("data.bin")?;
//!     let output = File::create("copy.bin")?;
//!
//!     let mut writer = HashingWriter::new(
//!         output,
//!         Blake3Accumulator::new,
//!         FixedStride::new(1 << 20),
//!         |offset: u64, digest: ChunkDigest| {
//!             println!("{offset} {digest}");
//!             Ok::<_, io::Error>(())
//!         },
//!     );
//!     io::copy(&mut input, &mut writer)?;
//!     writer.close()?.sync_all()?;
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use chunksum::{AsyncHashingWriter, Blake3Accumulator, ChunkDigest, FixedStride};
//! use futures_util::AsyncWriteExt;
//!
//! async fn demo<W: futures_io::AsyncWrite + Unpin>(dst: W, data: &[u8]) -> std::io::Result<()> {
//!     let mut writer = AsyncHashingWriter::new(
//!         dst,
//!         Blake3Accumulator::new,
//!         FixedStride::new(4096),
//!         |offset: u64, digest: ChunkDigest| {
//!             println!("{offset} {digest}");
//!             Ok::<_, std::io::Error>(())
//!         },
//!     );
//!     writer.write_all(data).await?;
//!     writer.close().await
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod boundary;
mod chunk;
mod config;
mod error;
mod hash;
mod writer;

#[cfg(feature = "async-io")]
mod async_writer;

//
// Public surface
//

pub use boundary::{BoundarySource, FixedStride, IterBoundaries};
pub use chunk::{ChunkDigest, DigestEvent, DigestSink, ExpectedDigests};
pub use config::{DEFAULT_STRIDE, StrideConfig};
pub use error::{BoxError, DigestMismatch, PartialWrite, SumError};
pub use hash::{Accumulator, AccumulatorFactory};
pub use writer::HashingWriter;

#[cfg(feature = "hash-blake3")]
pub use hash::Blake3Accumulator;

#[cfg(feature = "hash-digest")]
pub use hash::DigestAccumulator;

#[cfg(feature = "async-io")]
pub use async_writer::AsyncHashingWriter;
