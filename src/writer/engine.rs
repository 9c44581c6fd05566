//! Segmentation engine shared by the sync and async writers.
//!
//! The engine never touches the destination itself (except in
//! [`Segmenter::forward`], the blocking loop). It decides how long the next
//! run may be, and accounts for the bytes the destination accepted: hashing
//! them, advancing the counters, and emitting a digest when a boundary is hit.
//!
//! Invariant: `summed <= written <= next_stop` while boundaries are well formed.
//!
//! Once an accumulator refuses bytes the destination already accepted, the
//! chunk can no longer be digested correctly. The engine is then poisoned:
//! every later run and the trailing flush fail with [`SumError::Accumulator`].

use std::io::{self, Write};

use tracing::{debug, trace, warn};

use crate::boundary::BoundarySource;
use crate::chunk::DigestSink;
use crate::error::{PartialWrite, SumError};
use crate::hash::{Accumulator, AccumulatorFactory};

/// Chunk segmentation state for one stream.
pub(crate) struct Segmenter<F: AccumulatorFactory, B, S> {
    factory: F,
    boundaries: B,
    digests: S,
    accumulator: F::Accumulator,
    next_stop: u64,
    written: u64,
    summed: u64,
    /// Offset where an accumulator update failed.
    poisoned: Option<u64>,
}

impl<F, B, S> Segmenter<F, B, S>
where
    F: AccumulatorFactory,
    B: BoundarySource,
    S: DigestSink,
{
    /// Pulls the first boundary and the first accumulator.
    pub(crate) fn new(mut factory: F, mut boundaries: B, digests: S) -> Self {
        let next_stop = boundaries.next_boundary();
        let accumulator = factory.new_accumulator();
        trace!(first_boundary = next_stop, "segmenter started");
        Self {
            factory,
            boundaries,
            digests,
            accumulator,
            next_stop,
            written: 0,
            summed: 0,
            poisoned: None,
        }
    }

    /// Returns how many of `available` bytes fit before the next boundary.
    pub(crate) fn run_len(&self, available: usize) -> Result<usize, SumError> {
        self.check_poisoned()?;
        match self.next_stop.checked_sub(self.written) {
            Some(room) if room > 0 => {
                Ok(usize::try_from(room).map_or(available, |room| room.min(available)))
            }
            _ => {
                warn!(
                    boundary = self.next_stop,
                    position = self.written,
                    "boundary is not ahead of the stream"
                );
                Err(SumError::BoundaryNotAhead {
                    boundary: self.next_stop,
                    position: self.written,
                })
            }
        }
    }

    /// Accounts for bytes the destination accepted.
    ///
    /// `forwarded` must not extend past the current boundary; callers slice it
    /// with [`Segmenter::run_len`].
    pub(crate) fn absorb(&mut self, forwarded: &[u8]) -> Result<(), SumError> {
        if let Err(e) = self.accumulator.update(forwarded) {
            warn!(
                offset = self.written,
                len = forwarded.len(),
                error = %e,
                "accumulator refused forwarded bytes"
            );
            self.poisoned = Some(self.written);
            return Err(SumError::Accumulator(e));
        }
        self.written += forwarded.len() as u64;

        if self.written == self.next_stop {
            self.emit()?;
            self.summed = self.written;
            self.next_stop = self.boundaries.next_boundary();
            self.accumulator = self.factory.new_accumulator();
        }
        Ok(())
    }

    /// Forwards `buf` to `sink` run by run, blocking on every write.
    ///
    /// Stops early on a short write and returns the count accepted so far.
    pub(crate) fn forward<W: Write>(
        &mut self,
        sink: &mut W,
        buf: &[u8],
    ) -> Result<usize, PartialWrite> {
        let mut total = 0;
        while total < buf.len() {
            let run = match self.run_len(buf.len() - total) {
                Ok(run) => run,
                Err(error) => {
                    return Err(PartialWrite {
                        written: total,
                        error,
                    });
                }
            };
            let chunk = &buf[total..total + run];

            let n = match sink.write(chunk) {
                Ok(n) => n.min(run),
                Err(e) => {
                    return Err(PartialWrite {
                        written: total,
                        error: SumError::Sink(e),
                    });
                }
            };

            if let Err(error) = self.absorb(&chunk[..n]) {
                return Err(PartialWrite {
                    written: total + n,
                    error,
                });
            }
            total += n;

            if n < run {
                break;
            }
        }
        Ok(total)
    }

    /// Emits the trailing partial chunk, if any bytes are not yet summed.
    ///
    /// Safe to call more than once: a successful flush marks everything summed.
    pub(crate) fn finish(&mut self) -> Result<(), SumError> {
        self.check_poisoned()?;
        if self.summed == self.written {
            debug!(offset = self.written, "stream ended on a boundary");
            return Ok(());
        }
        debug!(
            offset = self.written,
            len = self.written - self.summed,
            "flushing trailing chunk"
        );
        self.emit()?;
        self.summed = self.written;
        Ok(())
    }

    fn check_poisoned(&self) -> Result<(), SumError> {
        match self.poisoned {
            Some(offset) => Err(SumError::Accumulator(io::Error::other(format!(
                "chunk at offset {offset} has forwarded bytes that were never hashed"
            )))),
            None => Ok(()),
        }
    }

    fn emit(&mut self) -> Result<(), SumError> {
        let offset = self.written;
        let digest = self.accumulator.finalize();
        trace!(offset, digest = %digest, "chunk complete");
        self.digests
            .on_digest(offset, digest)
            .map_err(|source| SumError::Rejected { offset, source })
    }
}

impl<F: AccumulatorFactory, B, S> Segmenter<F, B, S> {
    pub(crate) fn written(&self) -> u64 {
        self.written
    }

    pub(crate) fn summed(&self) -> u64 {
        self.summed
    }

    pub(crate) fn next_stop(&self) -> u64 {
        self.next_stop
    }
}

/// Maps a failed write onto `io::Write` rules.
///
/// Nothing forwarded: the error is returned now. Otherwise the forwarded count
/// is returned and the error parked in `slot` for the next call.
pub(crate) fn defer(
    slot: &mut Option<SumError>,
    written: usize,
    error: SumError,
) -> io::Result<usize> {
    if written == 0 {
        return Err(error.into());
    }
    debug!(written, %error, "deferring error after partial write");
    *slot = Some(error);
    Ok(written)
}

/// Picks the error to report from close: a deferred one wins.
pub(crate) fn first_error(
    deferred: Option<SumError>,
    flushed: Result<(), SumError>,
) -> Result<(), SumError> {
    match (deferred, flushed) {
        (Some(deferred), Err(flush_err)) => {
            warn!(error = %flush_err, "trailing flush failed after an earlier error");
            Err(deferred)
        }
        (Some(deferred), Ok(())) => Err(deferred),
        (None, flushed) => flushed,
    }
}
