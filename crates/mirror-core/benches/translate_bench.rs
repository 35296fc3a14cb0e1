//! Criterion benchmarks for the per-event hot path: key table lookups,
//! translation, and native packing.
//!
//! Every captured event is translated once per target, so these numbers are
//! multiplied by the number of mirrored windows.
//!
//! Run with:
//! ```bash
//! cargo bench --package mirror-core --bench translate_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mirror_core::keymap::{key_to_vk, vk_to_key, KeySymbol};
use mirror_core::{translate, MouseButton, RawInputEvent, Rect};

const BENCH_VK_CODES: &[u8] = &[
    0x41, // 'A'
    0x5A, // 'Z'
    0x0D, // VK_RETURN
    0x1B, // VK_ESCAPE
    0x20, // VK_SPACE
    0x70, // VK_F1
    0xA0, // VK_LSHIFT
    0x25, // VK_LEFT
    0x31, // '1'
    0xFF, // no mapping
];

const SOURCE: Rect = Rect::new(100, 100, 1380, 820);
const TARGET: Rect = Rect::new(1500, 40, 2140, 400);

// ── Key table ─────────────────────────────────────────────────────────────────

fn bench_vk_to_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap");

    group.bench_function("vk_to_key_batch_10", |b| {
        b.iter(|| {
            BENCH_VK_CODES
                .iter()
                .map(|&vk| vk_to_key(black_box(vk)))
                .collect::<Vec<_>>()
        })
    });

    // key_to_vk is a linear scan; best case is an early entry, worst case a miss.
    group.bench_with_input(
        BenchmarkId::new("key_to_vk", "Backspace"),
        &KeySymbol::Backspace,
        |b, &key| b.iter(|| key_to_vk(black_box(key))),
    );
    group.bench_with_input(
        BenchmarkId::new("key_to_vk", "Unmapped"),
        &KeySymbol::Char('é'),
        |b, &key| b.iter(|| key_to_vk(black_box(key))),
    );

    group.finish();
}

// ── Translation + packing ─────────────────────────────────────────────────────

fn bench_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate");

    let moves: Vec<RawInputEvent> = (0..64)
        .map(|i| RawInputEvent::MouseMove {
            x: 100 + i * 20,
            y: 100 + i * 11,
        })
        .collect();

    group.bench_function("mouse_move_burst_64", |b| {
        b.iter(|| {
            moves
                .iter()
                .filter_map(|ev| translate(black_box(ev), SOURCE, TARGET))
                .count()
        })
    });

    let click = RawInputEvent::MouseButton {
        button: MouseButton::Left,
        pressed: true,
        x: 640,
        y: 360,
    };
    group.bench_function("click_translate_and_pack", |b| {
        b.iter(|| translate(black_box(&click), SOURCE, TARGET).map(|m| m.packed()))
    });

    let key = RawInputEvent::Key {
        key: KeySymbol::Char('q'),
        scan_code: 0x10,
        pressed: true,
        text: Some('q'),
    };
    group.bench_function("key_translate_and_pack", |b| {
        b.iter(|| translate(black_box(&key), SOURCE, TARGET).map(|m| m.packed()))
    });

    group.finish();
}

criterion_group!(benches, bench_vk_to_key, bench_translate);
criterion_main!(benches);
