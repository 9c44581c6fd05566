//! Benchmarks for chunksum.
//!
//! Run with:
//!     cargo bench

use std::io::{self, Write};

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use sha2::Sha256;

use chunksum::{Blake3Accumulator, ChunkDigest, DigestAccumulator, FixedStride, HashingWriter};

fn count_digests(count: &mut usize) -> impl FnMut(u64, ChunkDigest) -> io::Result<()> + '_ {
    move |_: u64, digest: ChunkDigest| -> io::Result<()> {
        black_box(digest);
        *count += 1;
        Ok(())
    }
}

fn bench_strides(c: &mut Criterion) {
    let mut group = c.benchmark_group("strides");
    let size = 1024 * 1024; // 1 MB
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

    group.throughput(Throughput::Bytes(size as u64));
    for stride in [64u64, 4 * 1024, 64 * 1024, 1024 * 1024] {
        group.bench_function(format!("blake3_{}b", stride), |b| {
            b.iter(|| {
                let mut count = 0;
                let mut writer = HashingWriter::new(
                    io::sink(),
                    Blake3Accumulator::new,
                    FixedStride::new(stride),
                    count_digests(&mut count),
                );
                writer.write_all(black_box(&data)).unwrap();
                writer.close().unwrap();
                black_box(count)
            });
        });
    }

    group.bench_function("sha256_64k", |b| {
        b.iter(|| {
            let mut count = 0;
            let mut writer = HashingWriter::new(
                io::sink(),
                DigestAccumulator::<Sha256>::new,
                FixedStride::new(64 * 1024),
                count_digests(&mut count),
            );
            writer.write_all(black_box(&data)).unwrap();
            writer.close().unwrap();
            black_box(count)
        });
    });

    group.finish();
}

fn bench_write_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_sizes");
    let size = 1024 * 1024; // 1 MB
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

    group.throughput(Throughput::Bytes(size as u64));
    for piece in [16usize, 1024, 64 * 1024] {
        group.bench_function(format!("pieces_{}b", piece), |b| {
            b.iter(|| {
                let mut count = 0;
                let mut writer = HashingWriter::new(
                    io::sink(),
                    Blake3Accumulator::new,
                    FixedStride::new(4096),
                    count_digests(&mut count),
                );
                for chunk in data.chunks(piece) {
                    writer.write_all(black_box(chunk)).unwrap();
                }
                writer.close().unwrap();
                black_box(count)
            });
        });
    }

    // Baseline: plain copy into a sink, no hashing
    group.bench_function("baseline_sink", |b| {
        b.iter(|| {
            let mut sink = io::sink();
            sink.write_all(black_box(&data)).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_strides, bench_write_sizes);
criterion_main!(benches);
