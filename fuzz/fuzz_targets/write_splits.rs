#![no_main]

use std::io::{self, Write};

use libfuzzer_sys::fuzz_target;
use chunksum::{Blake3Accumulator, ChunkDigest, DigestEvent, FixedStride, HashingWriter};

fn events(data: &[u8], stride: u64, splits: &[u8]) -> (Vec<u8>, Vec<DigestEvent>) {
    let mut events = Vec::new();
    let mut writer = HashingWriter::new(
        Vec::new(),
        Blake3Accumulator::new,
        FixedStride::new(stride),
        |offset: u64, digest: ChunkDigest| {
            events.push(DigestEvent::new(offset, digest));
            Ok::<_, io::Error>(())
        },
    );

    let mut pos = 0;
    let mut sizes = splits.iter().map(|&s| s as usize + 1).cycle();
    while pos < data.len() {
        let size = sizes.next().unwrap_or(data.len());
        let end = (pos + size).min(data.len());
        writer.write_all(&data[pos..end]).unwrap();
        pos = end;
    }
    let out = writer.close().unwrap();
    (out, events)
}

fuzz_target!(|input: (u8, Vec<u8>, Vec<u8>)| {
    let (stride, splits, data) = input;
    let stride = stride as u64 + 1;

    let (out, reference) = events(&data, stride, &[]);

    // Verify: bytes are forwarded unmodified
    assert_eq!(out, data);

    // Verify: offsets strictly increase and end at the total length
    for pair in reference.windows(2) {
        assert!(pair[0].offset < pair[1].offset);
    }
    if !data.is_empty() {
        assert_eq!(reference.last().map(|e| e.offset), Some(data.len() as u64));
    }

    // Verify: each digest covers exactly its byte range
    let mut last = 0usize;
    for event in &reference {
        let end = event.offset as usize;
        assert_eq!(event.digest, Blake3Accumulator::digest(&data[last..end]));
        last = end;
    }

    // Verify: write granularity does not change the events
    let (_, split) = events(&data, stride, &splits);
    assert_eq!(split, reference);
});
