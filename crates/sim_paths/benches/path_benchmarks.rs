//! Criterion benchmarks for sim_paths generation.
//!
//! Measures a full generation step and the R/S estimator across the
//! resolutions offered by the simulator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sim_core::SimulationParameters;
use sim_paths::engine::PathEngine;
use sim_paths::estimator::RescaledRange;
use sim_paths::rng::GaussianSource;

/// Benchmark one full generation step (three paths + statistics + estimates).
fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for num_points in [128, 512, 2048] {
        let params = SimulationParameters::new(0.7, num_points, 2.0);
        let mut engine = PathEngine::from_seed(42);
        group.bench_with_input(
            BenchmarkId::new("generate", num_points),
            &params,
            |b, params| {
                b.iter(|| engine.generate(black_box(params)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark the rescaled-range estimator on white noise.
fn bench_estimator(c: &mut Criterion) {
    let mut group = c.benchmark_group("rescaled_range");
    let estimator = RescaledRange::default();

    for len in [256, 1024, 4096] {
        let mut source = GaussianSource::from_seed(7);
        let mut series = vec![0.0; len];
        source.fill(&mut series);

        group.bench_with_input(BenchmarkId::new("estimate", len), &series, |b, series| {
            b.iter(|| estimator.estimate(black_box(series)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation, bench_estimator);
criterion_main!(benches);
