//! Criterion benchmarks for pricecast hot paths.
//!
//! Benchmarks:
//! 1. Feature pipeline over ten years of synthetic data
//! 2. Rolling correlation primitive
//! 3. Classifier fit on the default parameters

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricecast_core::data::synthetic_pair;
use pricecast_core::features::build_dataset;
use pricecast_core::model::{BoostParams, GradientBoostedClassifier};
use pricecast_core::window::{pct_change, rolling_corr};

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for days in [500usize, 2520] {
        let (target, factor) = synthetic_pair("AAPL", "SMH", days);
        group.bench_with_input(BenchmarkId::from_parameter(days), &days, |b, _| {
            b.iter(|| build_dataset(black_box(&target), black_box(&factor), 5))
        });
    }
    group.finish();
}

fn bench_rolling_corr(c: &mut Criterion) {
    let (target, factor) = synthetic_pair("AAPL", "SMH", 2520);
    let a = pct_change(&target.prices(), 1);
    let b = pct_change(&factor.prices(), 1);
    c.bench_function("rolling_corr_30", |bench| {
        bench.iter(|| rolling_corr(black_box(&a), black_box(&b), 30))
    });
}

fn bench_fit(c: &mut Criterion) {
    let (target, factor) = synthetic_pair("AAPL", "SMH", 2520);
    let Ok(ds) = build_dataset(&target, &factor, 5) else {
        return;
    };
    let mut group = c.benchmark_group("fit");
    group.sample_size(10);
    group.bench_function("default_params", |b| {
        b.iter(|| {
            GradientBoostedClassifier::fit(
                BoostParams::default(),
                black_box(&ds.features),
                black_box(&ds.labels.values),
            )
        })
    });
    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_rolling_corr, bench_fit);
criterion_main!(benches);
