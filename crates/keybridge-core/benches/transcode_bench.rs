//! Criterion benchmarks for the UTF-8 ⇄ UTF-16 transcoder.
//!
//! Every key event re-encodes up to 128 characters of context, so the
//! forward direction sits on the hot path.
//!
//! Run with:
//! ```bash
//! cargo bench --package keybridge-core --bench transcode_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keybridge_core::encoding::{decode_utf16, encode_utf16z};

/// Builds a context window of `len` characters mixing BMP and astral text.
fn sample_context(len: usize) -> String {
    "aβ😀ग".chars().cycle().take(len).collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_utf16z");
    for len in [16usize, 64, 128] {
        let text = sample_context(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| encode_utf16z(black_box(text.as_bytes())))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_utf16");
    for len in [16usize, 64, 128] {
        let units = encode_utf16z(sample_context(len).as_bytes());
        let body = &units[..units.len() - 1];
        group.bench_with_input(BenchmarkId::from_parameter(len), body, |b, body| {
            b.iter(|| decode_utf16(black_box(body)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
