//! Simulation benchmarks for conquest_core.
//!
//! Run with: `cargo bench -p conquest_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use conquest_core::layout::{Layout, LayoutConfig};
use conquest_test_utils::fixtures::{density_2p, enqueue_scripted_moves};

/// Benchmarks layout generation for both strategies.
pub fn generation_benchmark(c: &mut Criterion) {
    c.bench_function("generate_density_15x15", |b| {
        let config = LayoutConfig::default().with_seed(7);
        b.iter(|| black_box(Layout::generate(2, &config)));
    });
    c.bench_function("generate_island_40x40", |b| {
        let config = LayoutConfig::island_large().with_seed(7);
        b.iter(|| black_box(Layout::generate(4, &config)));
    });
}

/// Benchmarks a scripted match advancing through full ticks.
pub fn tick_benchmark(c: &mut Criterion) {
    c.bench_function("tick_scripted_256", |b| {
        b.iter(|| {
            let mut game = density_2p(7);
            for _ in 0..256 {
                enqueue_scripted_moves(&mut game);
                game.tick();
            }
            black_box(game.state_hash())
        });
    });
}

criterion_group!(benches, generation_benchmark, tick_benchmark);
criterion_main!(benches);
