//! Blocking pass-through writer - HashingWriter.
//!
//! Every byte written is forwarded unmodified to the destination and fed to
//! the current accumulator. When the cumulative count reaches a boundary, the
//! chunk's digest goes to the digest sink and a fresh accumulator starts.
//!
//! # Example
//!
//! ```
//! use chunksum::{Blake3Accumulator, ChunkDigest, FixedStride, HashingWriter};
//! use std::io::Write;
//!
//! let mut events = Vec::new();
//! let mut writer = HashingWriter::new(
//!     Vec::new(),
//!     Blake3Accumulator::new,
//!     FixedStride::new(4),
//!     |offset: u64, digest: ChunkDigest| {
//!         events.push((offset, digest));
//!         Ok::<_, std::io::Error>(())
//!     },
//! );
//!
//! writer.write_all(b"hello world")?;
//! let out = writer.close()?;
//!
//! assert_eq!(out, b"hello world");
//! let offsets: Vec<u64> = events.iter().map(|(o, _)| *o).collect();
//! assert_eq!(offsets, vec![4, 8, 11]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::io::{self, Write};

use super::{Segmenter, defer, first_error};
use crate::boundary::BoundarySource;
use crate::chunk::DigestSink;
use crate::error::{PartialWrite, SumError};
use crate::hash::AccumulatorFactory;

/// A writer that forwards bytes and digests them chunk by chunk.
///
/// `HashingWriter` composes four collaborators:
///
/// - the destination `W`, which receives every byte unmodified
/// - an [`AccumulatorFactory`], asked for a fresh hash per chunk
/// - a [`BoundarySource`], asked for the next chunk end after every boundary
/// - a [`DigestSink`], told `(offset, digest)` for every completed chunk
///
/// # Determinism
///
/// The digest events depend only on the bytes and the boundary policy, not on
/// how the bytes are split across `write` calls (1 byte at a time or 1 MB).
///
/// # Errors
///
/// [`HashingWriter::forward`] reports exactly how many bytes reached the
/// destination before an error. The [`Write`] impl follows `io::Write` rules
/// instead: if some bytes were forwarded it returns that count and reports the
/// error on the next `write`, `flush` or [`close`](HashingWriter::close),
/// whichever comes first.
///
/// # Closing
///
/// [`HashingWriter::close`] digests the trailing partial chunk and hands the
/// destination back. Dropping the writer without closing loses that last
/// digest. The destination itself is never flushed or closed by `close`.
pub struct HashingWriter<W, F: AccumulatorFactory, B, S> {
    sink: W,
    core: Segmenter<F, B, S>,
    deferred: Option<SumError>,
}

impl<W, F, B, S> HashingWriter<W, F, B, S>
where
    W: Write,
    F: AccumulatorFactory,
    B: BoundarySource,
    S: DigestSink,
{
    /// Creates a writer.
    ///
    /// Pulls the first boundary from `boundaries` and the first accumulator
    /// from `factory` right away.
    ///
    /// # Arguments
    ///
    /// * `sink` - The destination for the forwarded bytes
    /// * `factory` - Produces one accumulator per chunk
    /// * `boundaries` - Yields cumulative chunk end offsets
    /// * `digests` - Receives each completed chunk's digest
    pub fn new(sink: W, factory: F, boundaries: B, digests: S) -> Self {
        Self {
            sink,
            core: Segmenter::new(factory, boundaries, digests),
            deferred: None,
        }
    }

    /// Forwards `buf`, digesting it along the way.
    ///
    /// Returns the number of bytes forwarded. That is `buf.len()` unless the
    /// destination made a short write, in which case the caller may retry
    /// the remainder.
    ///
    /// # Errors
    ///
    /// Stops at the first failure and returns a [`PartialWrite`] with the
    /// bytes forwarded before it:
    ///
    /// - [`SumError::Sink`] - the destination failed
    /// - [`SumError::Accumulator`] - the hash refused the bytes
    /// - [`SumError::Rejected`] - the digest sink rejected a chunk; bytes
    ///   already forwarded stay forwarded
    /// - [`SumError::BoundaryNotAhead`] - the boundary source broke its contract
    ///
    /// After an error further writes are not meaningful, but [`close`] may
    /// still be called.
    ///
    /// [`close`]: HashingWriter::close
    pub fn forward(&mut self, buf: &[u8]) -> Result<usize, PartialWrite> {
        if let Some(error) = self.deferred.take() {
            return Err(PartialWrite { written: 0, error });
        }
        self.core.forward(&mut self.sink, buf)
    }

    /// Digests the trailing partial chunk and returns the destination.
    ///
    /// No digest is emitted if the stream ended exactly on a boundary or
    /// nothing was written. An error deferred by the [`Write`] impl that no
    /// later `write` or `flush` has returned yet is reported here, after the
    /// trailing chunk has been attempted. Each deferred error is reported
    /// once.
    ///
    /// # Errors
    ///
    /// Besides a rejected trailing digest, fails with
    /// [`SumError::Accumulator`] if an accumulator refused bytes that were
    /// already forwarded: that chunk cannot be digested.
    pub fn close(mut self) -> Result<W, SumError> {
        let flushed = self.core.finish();
        first_error(self.deferred.take(), flushed)?;
        Ok(self.sink)
    }

    /// Returns the number of bytes forwarded and hashed.
    pub fn bytes_written(&self) -> u64 {
        self.core.written()
    }

    /// Returns the number of bytes covered by emitted digests.
    pub fn bytes_summed(&self) -> u64 {
        self.core.summed()
    }

    /// Returns the boundary the writer is heading for.
    pub fn next_boundary(&self) -> u64 {
        self.core.next_stop()
    }

    /// Returns a reference to the destination.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Returns a mutable reference to the destination.
    ///
    /// Bytes written through this reference bypass hashing.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }
}

impl<W, F, B, S> Write for HashingWriter<W, F, B, S>
where
    W: Write,
    F: AccumulatorFactory,
    B: BoundarySource,
    S: DigestSink,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(error) = self.deferred.take() {
            return Err(error.into());
        }
        match self.core.forward(&mut self.sink, buf) {
            Ok(n) => Ok(n),
            Err(PartialWrite { written, error }) => defer(&mut self.deferred, written, error),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(error) = self.deferred.take() {
            return Err(error.into());
        }
        self.sink.flush()
    }
}

impl<W: fmt::Debug, F: AccumulatorFactory, B, S> fmt::Debug for HashingWriter<W, F, B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashingWriter")
            .field("sink", &self.sink)
            .field("written", &self.core.written())
            .field("summed", &self.core.summed())
            .field("next_stop", &self.core.next_stop())
            .field("deferred", &self.deferred)
            .finish()
    }
}

#[cfg(all(test, feature = "hash-blake3"))]
mod tests {
    use super::*;
    use crate::boundary::FixedStride;
    use crate::chunk::ChunkDigest;
    use crate::error::BoxError;
    use crate::hash::{Accumulator, Blake3Accumulator};

    /// Refuses any input containing `!`.
    #[derive(Default)]
    struct Picky(Blake3Accumulator);

    impl Accumulator for Picky {
        fn update(&mut self, data: &[u8]) -> io::Result<()> {
            if data.contains(&b'!') {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "refused"));
            }
            self.0.update(data)
        }

        fn finalize(&self) -> ChunkDigest {
            self.0.finalize()
        }
    }

    /// Accepts at most `limit` bytes per call, then fails once `fail_after`
    /// total bytes have gone through.
    struct Stingy {
        out: Vec<u8>,
        limit: usize,
        fail_after: usize,
    }

    impl Write for Stingy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.out.len() >= self.fail_after {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            let n = buf.len().min(self.limit);
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(
        events: &mut Vec<u64>,
    ) -> impl FnMut(u64, ChunkDigest) -> Result<(), BoxError> + '_ {
        move |offset: u64, _: ChunkDigest| -> Result<(), BoxError> {
            events.push(offset);
            Ok(())
        }
    }

    #[test]
    fn test_empty_write_has_no_side_effects() {
        let mut events = Vec::new();
        let mut w = HashingWriter::new(
            Vec::new(),
            Blake3Accumulator::new,
            FixedStride::new(4),
            record(&mut events),
        );
        assert_eq!(w.forward(&[]).unwrap(), 0);
        assert_eq!(w.bytes_written(), 0);
        assert!(w.close().unwrap().is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_short_write_hashes_only_accepted_bytes() {
        let mut events = Vec::new();
        let sink = Stingy {
            out: Vec::new(),
            limit: 3,
            fail_after: usize::MAX,
        };
        let mut w = HashingWriter::new(
            sink,
            Blake3Accumulator::new,
            FixedStride::new(5),
            record(&mut events),
        );

        assert_eq!(w.forward(b"abcdefgh").unwrap(), 3);
        assert_eq!(w.bytes_written(), 3);

        w.write_all(b"defgh").unwrap();
        assert_eq!(w.bytes_written(), 8);
        let sink = w.close().unwrap();
        assert_eq!(sink.out, b"abcdefgh");
        assert_eq!(events, vec![5, 8]);
    }

    #[test]
    fn test_sink_error_reports_forwarded_count() {
        let mut events = Vec::new();
        let sink = Stingy {
            out: Vec::new(),
            limit: usize::MAX,
            fail_after: 4,
        };
        let mut w = HashingWriter::new(
            sink,
            Blake3Accumulator::new,
            FixedStride::new(4),
            record(&mut events),
        );

        let partial = w.forward(b"abcdefgh").unwrap_err();
        assert_eq!(partial.written, 4);
        match partial.error {
            SumError::Sink(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(w.bytes_written(), 4);
        assert_eq!(w.bytes_summed(), 4);
        w.close().unwrap();
        assert_eq!(events, vec![4]);
    }

    #[test]
    fn test_io_write_defers_error_after_progress() {
        let sink = Stingy {
            out: Vec::new(),
            limit: usize::MAX,
            fail_after: 4,
        };
        let mut w = HashingWriter::new(
            sink,
            Blake3Accumulator::new,
            FixedStride::new(4),
            |_: u64, _: ChunkDigest| Ok::<_, BoxError>(()),
        );

        assert_eq!(w.write(b"abcdefgh").unwrap(), 4);
        let err = w.write(b"efgh").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_rejection_keeps_forwarded_bytes() {
        let mut w = HashingWriter::new(
            Vec::new(),
            Blake3Accumulator::new,
            FixedStride::new(3),
            |offset: u64, _: ChunkDigest| {
                if offset == 6 {
                    Err::<(), _>(format!("bad sum at {}", offset))
                } else {
                    Ok(())
                }
            },
        );

        let partial = w.forward(b"abcdefghi").unwrap_err();
        assert_eq!(partial.written, 6);
        assert_eq!(partial.error.rejected_offset(), Some(6));
        assert_eq!(w.get_ref().as_slice(), b"abcdef");
        assert_eq!(w.bytes_summed(), 3);

        // The unacknowledged boundary blocks further writes.
        let partial = w.forward(b"ghi").unwrap_err();
        assert!(matches!(partial.error, SumError::BoundaryNotAhead { .. }));
    }

    #[test]
    fn test_accumulator_failure_on_first_run() {
        let mut events = Vec::new();
        let mut w = HashingWriter::new(
            Vec::new(),
            Picky::default,
            FixedStride::new(4),
            record(&mut events),
        );

        let partial = w.forward(b"ab!def").unwrap_err();
        assert_eq!(partial.written, 4);
        match partial.error {
            SumError::Accumulator(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(w.get_ref().as_slice(), b"ab!d");
        assert_eq!(w.bytes_written(), 0);
        assert_eq!(w.bytes_summed(), 0);

        // Forwarded but unhashed bytes must not pass close silently.
        let err = w.close().unwrap_err();
        assert!(matches!(err, SumError::Accumulator(_)));
        assert!(events.is_empty());
    }

    #[test]
    fn test_accumulator_failure_after_boundary() {
        let mut events = Vec::new();
        let mut w = HashingWriter::new(
            Vec::new(),
            Picky::default,
            FixedStride::new(4),
            record(&mut events),
        );

        let partial = w.forward(b"abcd!fghij").unwrap_err();
        assert_eq!(partial.written, 8);
        assert!(matches!(partial.error, SumError::Accumulator(_)));
        assert_eq!(w.get_ref().as_slice(), b"abcd!fgh");
        assert_eq!(w.bytes_written(), 4);
        assert_eq!(w.bytes_summed(), 4);

        // Later writes forward nothing.
        let partial = w.forward(b"ij").unwrap_err();
        assert_eq!(partial.written, 0);
        assert!(matches!(partial.error, SumError::Accumulator(_)));
        assert_eq!(w.get_ref().len(), 8);

        assert!(matches!(w.close(), Err(SumError::Accumulator(_))));
        assert_eq!(events, vec![4]);
    }

    #[test]
    fn test_io_write_surfaces_accumulator_failure() {
        let mut w = HashingWriter::new(
            Vec::new(),
            Picky::default,
            FixedStride::new(4),
            |_: u64, _: ChunkDigest| Ok::<_, BoxError>(()),
        );

        assert_eq!(w.write(b"abcd!f").unwrap(), 6);
        let err = w.write(b"gh").unwrap_err();
        let inner = err
            .get_ref()
            .and_then(|e| e.downcast_ref::<SumError>())
            .unwrap();
        assert!(matches!(inner, SumError::Accumulator(_)));
        assert!(w.close().is_err());
    }

    #[test]
    fn test_flush_consumes_deferred_error() {
        let sink = Stingy {
            out: Vec::new(),
            limit: usize::MAX,
            fail_after: 4,
        };
        let mut events = Vec::new();
        let mut w = HashingWriter::new(
            sink,
            Blake3Accumulator::new,
            FixedStride::new(4),
            record(&mut events),
        );

        assert_eq!(w.write(b"abcdefgh").unwrap(), 4);
        assert_eq!(w.flush().unwrap_err().kind(), io::ErrorKind::BrokenPipe);
        assert!(w.flush().is_ok());

        // Already reported by flush, so close has nothing left to report.
        w.close().unwrap();
        assert_eq!(events, vec![4]);
    }

    #[test]
    fn test_close_reports_deferred_error() {
        let mut w = HashingWriter::new(
            Vec::new(),
            Blake3Accumulator::new,
            FixedStride::new(2),
            |offset: u64, _: ChunkDigest| {
                if offset == 2 {
                    Err::<(), _>("nope")
                } else {
                    Ok(())
                }
            },
        );

        // The rejected chunk's bytes were forwarded, so write reports them.
        assert_eq!(w.write(b"abc").unwrap(), 2);
        let err = w.close().unwrap_err();
        assert_eq!(err.rejected_offset(), Some(2));
    }
}
