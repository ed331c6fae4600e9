use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use trainjob::data::{train_test_split, Dataset};
use trainjob::training::{ridge_alphas, DecisionTree, EstimatorConfig, RidgeRegression};

fn create_classification_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);
    // Three classes from the row sum
    let y = x.rows().into_iter().map(|row| (row.sum() / n_features as f64 / 3.4).floor().min(2.0)).collect();
    (x, y)
}

fn create_regression_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() - 0.5);
    let weights = Array1::from_iter((0..n_features).map(|i| i as f64 + 1.0));
    let noise = Array1::from_shape_fn(n_rows, |_| rng.gen::<f64>() * 0.1);
    let y = x.dot(&weights) + noise;
    (x, y)
}

fn bench_decision_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("decision_tree");
    group.sample_size(10); // Fewer samples for training benchmarks

    for n_rows in [150, 1000, 5000].iter() {
        let (x, y) = create_classification_data(*n_rows, 4);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut tree = DecisionTree::new();
                tree.fit(black_box(x), black_box(y)).unwrap();
                tree
            })
        });
    }

    group.finish();
}

fn bench_ridge(c: &mut Criterion) {
    let mut group = c.benchmark_group("ridge");

    for n_rows in [442, 5000, 20000].iter() {
        let (x, y) = create_regression_data(*n_rows, 10);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut ridge = RidgeRegression::new(0.5);
                ridge.fit(black_box(x), black_box(y)).unwrap();
                ridge
            })
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let (x, y) = create_regression_data(442, 10);
    let dataset = Dataset::new(x, y).unwrap();
    let split = train_test_split(&dataset, 0.2, 0).unwrap();

    c.bench_function("ridge_sweep_442", |b| {
        b.iter(|| {
            ridge_alphas()
                .map(|alpha| EstimatorConfig::ridge(alpha).fit(black_box(&split.train)).unwrap())
                .count()
        })
    });
}

criterion_group!(benches, bench_decision_tree, bench_ridge, bench_sweep);
criterion_main!(benches);
