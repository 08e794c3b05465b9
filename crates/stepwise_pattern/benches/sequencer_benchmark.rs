//! # Pattern Engine Benchmark
//!
//! REQUIREMENTS:
//! - `next()` (six scalar reads + macro bookkeeping) well under a microsecond
//! - Position lookups cost the same as index lookups
//! - Resampling cost scales linearly with step count
//!
//! Run with: `cargo bench --package stepwise_pattern`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stepwise_pattern::{Axis, Component, PatternEngine, ShapedCurve};

fn sine_engine() -> PatternEngine {
    let curve = ShapedCurve::new(|x| 0.5 + 0.5 * (x * std::f32::consts::TAU).sin());
    PatternEngine::with_curve(Arc::new(curve))
}

/// Benchmark: read path.
fn bench_reads(c: &mut Criterion) {
    let engine = sine_engine();
    let mut group = c.benchmark_group("pattern_reads");

    group.bench_function("next_macro", |b| b.iter(|| black_box(engine.next())));

    group.bench_function("next_trigger", |b| {
        b.iter(|| black_box(engine.next_trigger(Component::Y)));
    });

    group.bench_function("value_at", |b| {
        let mut pos = 0.0_f32;
        b.iter(|| {
            pos = (pos + 0.013) % 1.0;
            black_box(engine.value_at(Component::Y, black_box(pos)))
        });
    });

    group.bench_function("vector_at_index", |b| {
        let mut i = 0_isize;
        b.iter(|| {
            i = i.wrapping_add(1);
            black_box(engine.vector_at_index(black_box(i)))
        });
    });

    group.finish();
}

/// Benchmark: control path resampling.
fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_resample");

    for steps in [16_usize, 256, 4096] {
        let engine = sine_engine();
        group.bench_with_input(BenchmarkId::new("one_axis", steps), &steps, |b, &steps| {
            b.iter(|| engine.set_num_steps(Axis::Value(Component::Y), black_box(steps)));
        });
    }

    let engine = sine_engine();
    group.bench_function("all_axes", |b| {
        let mut amp = 0.0_f32;
        b.iter(|| {
            amp = (amp + 0.1) % 1.0;
            engine.set_amp_offset(black_box(amp));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_reads, bench_resample);
criterion_main!(benches);
