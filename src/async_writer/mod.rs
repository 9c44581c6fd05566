//! Async forwarding support.
//!
//! This module provides the forwarding writer over the `futures-io::AsyncWrite`
//! trait, making it runtime-agnostic and compatible with tokio, async-std,
//! smol, and other async runtimes.
//!
//! - [`AsyncHashingWriter`] - Async pass-through writer with per-chunk digests
//!
//! This module requires the `async-io` feature to be enabled.

mod writer;

pub use writer::AsyncHashingWriter;
