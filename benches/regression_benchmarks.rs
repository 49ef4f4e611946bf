use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use klinkenberg::dataset::{SyntheticParams, synthetic};
use klinkenberg::engine::{Regressor, correct, fit, reciprocal_pressure};

fn make_samples(points: usize) -> Vec<klinkenberg::engine::Sample> {
    let params = SyntheticParams {
        points,
        min_pressure: 10.0,
        max_pressure: 5000.0,
        noise: 0.01,
        ..SyntheticParams::default()
    };
    synthetic(&params, &mut SmallRng::seed_from_u64(3))
}

fn bench_fit(c: &mut Criterion) {
    let points = reciprocal_pressure(&make_samples(10_000)).unwrap();

    c.bench_function("fit (10k points)", |b| b.iter(|| fit(black_box(&points))));
}

fn bench_correct(c: &mut Criterion) {
    let samples = make_samples(10_000);
    let regressor = Regressor::default();

    c.bench_function("correct (10k samples)", |b| {
        b.iter(|| correct(black_box(&samples), &regressor))
    });
}

criterion_group!(benches, bench_fit, bench_correct);
criterion_main!(benches);
