//! Criterion benchmarks for the scan-code table and cursor-move check.
//!
//! Run with:
//! ```bash
//! cargo bench --package keybridge-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keybridge_core::keymap::KeyMapper;

/// X11 keycodes for a typical typing burst, including a modifier and an
/// out-of-range code.
const BENCH_KEYCODES: &[u32] = &[38, 56, 54, 40, 65, 22, 36, 64, 108, 113, 0, 300];

fn bench_x11_keycode_to_vkey(c: &mut Criterion) {
    c.bench_function("x11_keycode_to_vkey", |b| {
        b.iter(|| {
            for &code in BENCH_KEYCODES {
                black_box(KeyMapper::x11_keycode_to_vkey(black_box(code)));
            }
        })
    });
}

fn bench_is_cursor_move(c: &mut Criterion) {
    c.bench_function("is_cursor_move", |b| {
        b.iter(|| {
            for keysym in [0x0061u32, 0xFF08, 0xFF51, 0xFF9C] {
                black_box(KeyMapper::is_cursor_move(black_box(keysym)));
            }
        })
    });
}

criterion_group!(benches, bench_x11_keycode_to_vkey, bench_is_cursor_move);
criterion_main!(benches);
