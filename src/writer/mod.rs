//! Forwarding writers.
//!
//! - [`HashingWriter`] - Blocking pass-through writer with per-chunk digests

mod engine;
mod hashing;

pub(crate) use engine::{Segmenter, defer, first_error};
pub use hashing::HashingWriter;
