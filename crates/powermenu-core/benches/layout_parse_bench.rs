//! Criterion benchmarks for layout loading.
//!
//! Measures how parse time scales with the number of buttons, including the
//! token-buffer rescans triggered once a layout outgrows the initial token
//! capacity.
//!
//! Run with:
//! ```bash
//! cargo bench --package powermenu-core --bench layout_parse_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use powermenu_core::layout::{parse, tokenize};

// ── Fixture builders ──────────────────────────────────────────────────────────

/// Builds a layout with `n` fully populated button objects.
fn layout_with_n_buttons(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "{{\n  \"label\": \"button{i}\",\n  \"action\": \"echo {i}\",\n  \"text\": \"Button {i}\",\n  \"keybind\": \"{}\",\n  \"circular\": false\n}}\n",
                (b'a' + (i % 26) as u8) as char
            )
        })
        .collect()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for n in [6usize, 25, 100] {
        let src = layout_with_n_buttons(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &src, |b, src| {
            b.iter(|| tokenize(black_box(src)).expect("tokenize"))
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for n in [6usize, 25, 100] {
        let src = layout_with_n_buttons(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &src, |b, src| {
            b.iter(|| parse(black_box(src)).expect("parse"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse);
criterion_main!(benches);
