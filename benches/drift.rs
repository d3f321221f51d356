use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kolosal_drift::data::{extract_features, FeatureSchema, Table};
use kolosal_drift::drift::{DriftDetector, FeatureDriftTester, KolmogorovSmirnovTest, PopulationStabilityIndex};
use ndarray::Array1;
use rand::prelude::*;

fn random_sample(rng: &mut StdRng, n: usize, shift: f64) -> Vec<f64> {
    (0..n).map(|_| rng.gen::<f64>() * 10.0 + shift).collect()
}

fn create_tables(n_rows: usize, n_features: usize) -> (Table, Table) {
    let mut rng = StdRng::seed_from_u64(42);
    let names: Vec<String> = (0..n_features).map(|i| format!("feature_{}", i)).collect();

    let baseline_cols: Vec<(&str, Vec<f64>)> =
        names.iter().map(|n| (n.as_str(), random_sample(&mut rng, n_rows, 0.0))).collect();
    let production_cols: Vec<(&str, Vec<f64>)> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), random_sample(&mut rng, n_rows, (i % 3) as f64 * 0.5)))
        .collect();

    (
        Table::from_numeric("baseline", baseline_cols).unwrap(),
        Table::from_numeric("production", production_cols).unwrap(),
    )
}

fn bench_tests(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_feature");
    let mut rng = StdRng::seed_from_u64(7);

    for n in [1_000, 10_000, 100_000].iter() {
        let baseline = Array1::from(random_sample(&mut rng, *n, 0.0));
        let production = Array1::from(random_sample(&mut rng, *n, 0.3));

        let ks = KolmogorovSmirnovTest::default();
        group.bench_with_input(BenchmarkId::new("ks", n), &(&baseline, &production), |b, (base, prod)| {
            b.iter(|| ks.detect(black_box(base), black_box(prod)).unwrap())
        });

        let psi = PopulationStabilityIndex::default();
        group.bench_with_input(BenchmarkId::new("psi", n), &(&baseline, &production), |b, (base, prod)| {
            b.iter(|| psi.detect(black_box(base), black_box(prod)).unwrap())
        });
    }

    group.finish();
}

fn bench_all_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_features");
    group.sample_size(20);

    let (baseline, production) = create_tables(20_000, 32);
    let schema = FeatureSchema::intersect(&baseline, &production, None, &[]).unwrap();
    let (pairs, _) = extract_features(&schema, &baseline, &production, 2).unwrap();
    let tester = FeatureDriftTester::default();

    group.bench_function("sequential", |b| b.iter(|| tester.test_all(black_box(&pairs), false).unwrap()));
    group.bench_function("parallel", |b| b.iter(|| tester.test_all(black_box(&pairs), true).unwrap()));

    group.finish();
}

criterion_group!(benches, bench_tests, bench_all_features);
criterion_main!(benches);
