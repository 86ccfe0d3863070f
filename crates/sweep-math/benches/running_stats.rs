//! Criterion benchmarks for the streaming accumulators.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sweep_math::{RunningMax, RunningMean};

fn bench_running_mean(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| (i as f64).powf(1.5) + 0.25).collect();
    c.bench_function("running_mean_10k", |b| {
        b.iter(|| {
            let mut m = RunningMean::new();
            for v in &values {
                m.push(black_box(*v));
            }
            black_box(m.mean())
        })
    });
}

fn bench_running_max(c: &mut Criterion) {
    let values: Vec<i64> = (0..10_000).map(|i| (i * 7919) % 10_007).collect();
    c.bench_function("running_max_10k", |b| {
        b.iter(|| {
            let mut m = RunningMax::new();
            for v in &values {
                m.push(black_box(*v));
            }
            black_box(m.max())
        })
    });
}

criterion_group!(benches, bench_running_mean, bench_running_max);
criterion_main!(benches);
