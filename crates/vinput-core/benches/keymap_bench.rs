//! Criterion benchmarks for symbolic key resolution and record encoding.
//!
//! Every action resolves its key names before emitting anything, so lookup
//! cost sits directly on the request path.
//!
//! Run with:
//! ```bash
//! cargo bench --package vinput-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vinput_core::keymap::{KeyCode, KeySymbolTable};
use vinput_core::protocol::event::{InputEventRecord, KeyState};

/// Names a typical shortcut-heavy client sends, in mixed case.
const BENCH_NAMES: &[&str] = &[
    "ctrl", "Shift", "ALT", "super", "a", "c", "v", "z", "enter", "esc", "tab", "F5", "f12",
    "PageDown", "left", "right", "space", "backspace", "delete", "nosuchkey",
];

fn bench_lookup(c: &mut Criterion) {
    let table = KeySymbolTable::new();
    let mut group = c.benchmark_group("keymap_lookup");

    group.bench_with_input(BenchmarkId::new("lookup", "ctrl"), &"ctrl", |b, name| {
        b.iter(|| table.lookup(black_box(name)))
    });

    group.bench_with_input(
        BenchmarkId::new("lookup", "PageDown"),
        &"PageDown",
        |b, name| b.iter(|| table.lookup(black_box(name))),
    );

    group.bench_function("lookup_batch_20", |b| {
        b.iter(|| {
            BENCH_NAMES
                .iter()
                .map(|name| table.lookup(black_box(name)))
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("lookup_button_default", |b| {
        b.iter(|| table.lookup_button(black_box("left")))
    });

    group.finish();
}

fn bench_names(c: &mut Criterion) {
    let table = KeySymbolTable::new();
    c.bench_function("keymap_names_enumeration", |b| b.iter(|| table.names()));
}

fn bench_encode_record(c: &mut Criterion) {
    c.bench_function("input_event_to_bytes", |b| {
        b.iter(|| InputEventRecord::key(black_box(KeyCode::A), KeyState::Down).to_bytes())
    });
}

criterion_group!(benches, bench_lookup, bench_names, bench_encode_record);
criterion_main!(benches);
