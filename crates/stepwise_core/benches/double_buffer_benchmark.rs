//! # Double Buffer Benchmark
//!
//! REQUIREMENTS:
//! - `read_at` in the tens of nanoseconds
//! - 0 allocations on the read path
//! - Reads stay flat while a writer republishes
//!
//! Run with: `cargo bench --package stepwise_core`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stepwise_core::DoubleBuffer;

/// Benchmark: indexed reads at several sequence lengths.
fn bench_read_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("double_buffer_read_at");

    for len in [16_usize, 256, 4096] {
        let buffer = DoubleBuffer::new(vec![0.5_f32; len]);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            let mut tick = 0_usize;
            b.iter(|| {
                tick = tick.wrapping_add(1);
                black_box(buffer.read_at(black_box(tick)))
            });
        });
    }

    group.finish();
}

/// Benchmark: republishing a sequence (control path).
fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("double_buffer_publish");

    for len in [16_usize, 256, 4096] {
        let buffer = DoubleBuffer::new(vec![0.0_f32; len]);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| buffer.publish(black_box(vec![1.0; len])));
        });
    }

    group.finish();
}

/// Benchmark: reads while another thread republishes continuously.
fn bench_read_under_publish(c: &mut Criterion) {
    let buffer = Arc::new(DoubleBuffer::new(vec![0.0_f32; 64]));
    let running = Arc::new(AtomicBool::new(true));

    let writer = {
        let buffer = Arc::clone(&buffer);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut k = 0.0_f32;
            while running.load(Ordering::Relaxed) {
                k += 1.0;
                let _ = buffer.publish(vec![k; 64]);
            }
        })
    };

    c.bench_function("double_buffer_read_under_publish", |b| {
        let mut tick = 0_usize;
        b.iter(|| {
            tick = tick.wrapping_add(1);
            black_box(buffer.read_at(tick))
        });
    });

    running.store(false, Ordering::Relaxed);
    let _ = writer.join();
}

criterion_group!(benches, bench_read_at, bench_publish, bench_read_under_publish);
criterion_main!(benches);
