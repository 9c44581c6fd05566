//! Copy a file while recording per-chunk digests, then verify the copy.
//!
//! Run with:
//!     cargo run --example verify_file -- /path/to/file

use std::env;
use std::fs::File;
use std::io;

use chunksum::{
    Blake3Accumulator, ChunkDigest, DigestEvent, ExpectedDigests, HashingWriter, StrideConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Digesting file: {}\n", path);

    // A boundary every 4 KiB
    let config = StrideConfig::new(4 * 1024)?;

    // First pass: record one digest per chunk
    let mut events = Vec::new();
    let mut writer = HashingWriter::new(
        io::sink(),
        Blake3Accumulator::new,
        config.boundaries(),
        |offset: u64, digest: ChunkDigest| {
            events.push(DigestEvent::new(offset, digest));
            Ok::<_, io::Error>(())
        },
    );
    let copied = io::copy(&mut File::open(&path)?, &mut writer)?;
    writer.close()?;

    for (i, event) in events.iter().enumerate() {
        println!("Chunk {:>4}: end={:>10}, blake3={}", i + 1, event.offset, event.digest);
    }
    println!("\nTotal: {} chunks, {} bytes", events.len(), copied);

    // Second pass: verify the file still matches
    let mut expected: ExpectedDigests = events.into_iter().collect();
    let mut writer = HashingWriter::new(
        io::sink(),
        Blake3Accumulator::new,
        config.boundaries(),
        &mut expected,
    );
    io::copy(&mut File::open(&path)?, &mut writer)?;
    writer.close()?;

    if !expected.is_complete() {
        return Err(format!(
            "file is shorter than recorded: {} of {} chunks seen",
            expected.verified(),
            expected.len()
        )
        .into());
    }
    println!("Verified: {} chunks match", expected.verified());
    Ok(())
}
