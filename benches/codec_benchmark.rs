//! Benchmarks for shrink encoding and decoding.
//!
//! Measures throughput across data shapes (repetitive, text-like, random)
//! and window sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use shrink::{Config, Decoder, Encoder};
use std::io::Read;

fn generate_repetitive(len: usize) -> Vec<u8> {
    b"abcdefgh".iter().cycle().take(len).copied().collect()
}

fn generate_text_like(len: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog. "
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

fn generate_random(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    let mut data = vec![0u8; len];
    rng.fill(&mut data[..]);
    data
}

fn compress(data: &[u8], config: Config) -> Vec<u8> {
    let mut encoder = Encoder::new(Vec::new(), config);
    encoder.write(data).unwrap();
    encoder.finish().unwrap()
}

fn encoding_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Encoding");

    let len = 64 * 1024;
    let shapes = [
        ("repetitive", generate_repetitive(len)),
        ("text", generate_text_like(len)),
        ("random", generate_random(len)),
    ];

    for (shape, data) in &shapes {
        group.throughput(Throughput::Bytes(data.len() as u64));
        for window in [8u8, 11] {
            let config = Config::new(window, 4);
            group.bench_with_input(
                BenchmarkId::new(format!("w{window}"), shape),
                data,
                |b, data| {
                    b.iter(|| compress(black_box(data), config));
                },
            );
        }
    }

    group.finish();
}

fn decoding_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decoding");

    let len = 64 * 1024;
    let shapes = [
        ("repetitive", generate_repetitive(len)),
        ("text", generate_text_like(len)),
        ("random", generate_random(len)),
    ];

    for (shape, data) in &shapes {
        let config = Config::default();
        let encoded = compress(data, config);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("w8", shape),
            &encoded,
            |b, encoded| {
                b.iter(|| {
                    let mut decoder = Decoder::new(black_box(encoded.as_slice()), config);
                    let mut out = Vec::with_capacity(len);
                    decoder.read_to_end(&mut out).unwrap();
                    out
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, encoding_benchmark, decoding_benchmark);
criterion_main!(benches);
