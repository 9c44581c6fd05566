//! Async pass-through writer.
//!
//! Same segmentation as [`HashingWriter`](crate::HashingWriter), driven by
//! `poll_write` instead of blocking writes. Boundary sources and digest sinks
//! stay synchronous and run inside the poll.
//!
//! # Example
//!
//! ```ignore
//! use chunksum::{AsyncHashingWriter, Blake3Accumulator, ChunkDigest, FixedStride};
//! use futures_util::AsyncWriteExt;
//! use tokio_util::compat::TokioAsyncWriteCompatExt;
//!
//! let file = tokio::fs::File::create("copy.bin").await?.compat_write();
//! let mut writer = AsyncHashingWriter::new(
//!     file,
//!     Blake3Accumulator::new,
//!     FixedStride::new(1 << 20),
//!     |offset: u64, digest: ChunkDigest| {
//!         println!("{offset} {digest}");
//!         Ok::<_, std::io::Error>(())
//!     },
//! );
//! writer.write_all(&data).await?;
//! writer.close().await?; // trailing digest, then the file is closed
//! ```

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::AsyncWrite;
use pin_project_lite::pin_project;

use crate::boundary::BoundarySource;
use crate::chunk::DigestSink;
use crate::error::SumError;
use crate::hash::AccumulatorFactory;
use crate::writer::{Segmenter, defer, first_error};

pin_project! {
    /// An async writer that forwards bytes and digests them chunk by chunk.
    ///
    /// Uses `futures_io::AsyncWrite`, so it works with any runtime. Tokio
    /// writers can be adapted with `tokio_util::compat`.
    ///
    /// # Closing
    ///
    /// `AsyncWrite::poll_close` emits the trailing digest once and then closes
    /// the destination, as `AsyncWrite` expects. To keep the destination open,
    /// call [`AsyncHashingWriter::finish`] instead.
    pub struct AsyncHashingWriter<W, F, B, S>
    where
        F: AccumulatorFactory,
    {
        #[pin]
        sink: W,
        core: Segmenter<F, B, S>,
        deferred: Option<SumError>,
        closed: bool,
    }
}

impl<W, F, B, S> AsyncHashingWriter<W, F, B, S>
where
    W: AsyncWrite,
    F: AccumulatorFactory,
    B: BoundarySource,
    S: DigestSink,
{
    /// Creates a writer; see [`HashingWriter::new`](crate::HashingWriter::new).
    pub fn new(sink: W, factory: F, boundaries: B, digests: S) -> Self {
        Self {
            sink,
            core: Segmenter::new(factory, boundaries, digests),
            deferred: None,
            closed: false,
        }
    }

    /// Digests the trailing partial chunk and returns the destination
    /// without closing it.
    ///
    /// Does nothing more if `poll_close` already ran.
    pub fn finish(self) -> Result<W, SumError> {
        let Self {
            sink,
            mut core,
            deferred,
            ..
        } = self;
        let flushed = core.finish();
        first_error(deferred, flushed)?;
        Ok(sink)
    }

    /// Returns the number of bytes forwarded and hashed.
    pub fn bytes_written(&self) -> u64 {
        self.core.written()
    }

    /// Returns the number of bytes covered by emitted digests.
    pub fn bytes_summed(&self) -> u64 {
        self.core.summed()
    }

    /// Returns a reference to the destination.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }
}

impl<W, F, B, S> AsyncWrite for AsyncHashingWriter<W, F, B, S>
where
    W: AsyncWrite,
    F: AccumulatorFactory,
    B: BoundarySource,
    S: DigestSink,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut this = self.project();

        if let Some(error) = this.deferred.take() {
            return Poll::Ready(Err(error.into()));
        }

        let mut total = 0;
        while total < buf.len() {
            let run = match this.core.run_len(buf.len() - total) {
                Ok(run) => run,
                Err(error) => return Poll::Ready(defer(this.deferred, total, error)),
            };
            let chunk = &buf[total..total + run];

            let n = match this.sink.as_mut().poll_write(cx, chunk) {
                // Bytes from earlier runs are already hashed; report them.
                Poll::Pending if total > 0 => return Poll::Ready(Ok(total)),
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => {
                    return Poll::Ready(defer(this.deferred, total, SumError::Sink(e)));
                }
                Poll::Ready(Ok(n)) => n.min(run),
            };

            if let Err(error) = this.core.absorb(&chunk[..n]) {
                return Poll::Ready(defer(this.deferred, total + n, error));
            }
            total += n;

            if n < run {
                break;
            }
        }
        Poll::Ready(Ok(total))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.project();
        if let Some(error) = this.deferred.take() {
            return Poll::Ready(Err(error.into()));
        }
        this.sink.poll_flush(cx)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.project();
        if !*this.closed {
            *this.closed = true;
            let flushed = this.core.finish();
            if let Err(error) = first_error(this.deferred.take(), flushed) {
                return Poll::Ready(Err(error.into()));
            }
        }
        this.sink.poll_close(cx)
    }
}

impl<W: fmt::Debug, F: AccumulatorFactory, B, S> fmt::Debug for AsyncHashingWriter<W, F, B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncHashingWriter")
            .field("sink", &self.sink)
            .field("written", &self.core.written())
            .field("summed", &self.core.summed())
            .field("closed", &self.closed)
            .finish()
    }
}
