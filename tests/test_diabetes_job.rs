//! Integration tests for the diabetes ridge sweep

use ndarray::{Array1, Array2};
use ndarray_npy::write_npy;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use trainjob::config::JobConfig;
use trainjob::data::{FEATURES_FILE, LABELS_FILE};
use trainjob::error::TrainJobError;
use trainjob::pipeline::run_diabetes_job;
use trainjob::tracking::{InMemoryRegistry, LocalRun, RunStatus, RunStore};
use trainjob::training::ridge_alphas;

// ============================================================================
// Helpers
// ============================================================================

/// 442 x 10 standardized-looking features with a noisy linear target
fn write_diabetes_like(features_dir: &Path, labels_dir: &Path) {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let x = Array2::from_shape_fn((442, 10), |_| rng.gen_range(-0.1..0.1));
    let weights = Array1::from_iter((0..10).map(|i| (i as f64 - 4.5) * 100.0));
    let noise = Array1::from_shape_fn(442, |_| rng.gen_range(-5.0..5.0));
    let y = x.dot(&weights) + noise + 150.0;

    std::fs::create_dir_all(features_dir).unwrap();
    std::fs::create_dir_all(labels_dir).unwrap();
    write_npy(features_dir.join(FEATURES_FILE), &x).unwrap();
    write_npy(labels_dir.join(LABELS_FILE), &y).unwrap();
}

fn new_run() -> LocalRun {
    LocalRun::start("diabetes-test", InMemoryRegistry::new())
}

fn job_config(outputs: &Path) -> JobConfig {
    JobConfig::default().with_outputs_dir(outputs)
}

// ============================================================================
// Job behavior
// ============================================================================

#[test]
fn test_sweep_prints_twenty_lines_in_alpha_order() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    write_diabetes_like(&data.join("arrays"), &data.join("arrays"));

    let mut out = Vec::new();
    run_diabetes_job(&mut new_run(), &data, &job_config(&dir.path().join("outputs")), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 20);
    for (line, alpha) in lines.iter().zip(ridge_alphas()) {
        let prefix = format!("alpha is {:.2}, and mse is ", alpha);
        assert!(line.starts_with(&prefix), "{line}");
        let mse: f64 = line[prefix.len()..].parse().unwrap();
        assert!(mse >= 0.0);
    }
    assert!(lines[0].starts_with("alpha is 0.00,"));
    assert!(lines[19].starts_with("alpha is 0.95,"));
}

#[test]
fn test_sweep_writes_one_file_per_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    write_diabetes_like(&data, &data);
    let outputs = dir.path().join("outputs");

    let report = run_diabetes_job(&mut new_run(), &data, &job_config(&outputs), &mut Vec::new()).unwrap();

    let mut files: Vec<String> = std::fs::read_dir(&outputs)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    let expected: Vec<String> = ridge_alphas().map(|a| format!("ridge_{:.2}.pkl", a)).collect();
    assert_eq!(files, expected);
    assert_eq!(report.points.len(), 20);
    assert_eq!(report.points[3].artifact, outputs.join("ridge_0.15.pkl"));
}

#[test]
fn test_sweep_logs_alpha_and_mse_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    write_diabetes_like(&data, &data);
    let mut run = new_run();

    let report = run_diabetes_job(&mut run, &data, &job_config(&dir.path().join("outputs")), &mut Vec::new()).unwrap();

    let alphas = run.metric_series("alpha");
    let mses = run.metric_series("mse");
    assert_eq!(alphas, ridge_alphas().collect::<Vec<_>>());
    assert_eq!(mses.len(), 20);
    for (point, mse) in report.points.iter().zip(&mses) {
        assert_eq!(point.mse, *mse);
    }

    // alpha then mse for every configuration
    let record = run.complete().unwrap();
    let keys: Vec<&str> = record.metrics.iter().map(|m| m.key.as_str()).collect();
    for pair in keys.chunks(2) {
        assert_eq!(pair, ["alpha", "mse"]);
    }
    assert_eq!(record.artifacts.len(), 20);
}

#[test]
fn test_heavy_penalty_raises_mse() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    write_diabetes_like(&data, &data);

    let report = run_diabetes_job(&mut new_run(), &data, &job_config(&dir.path().join("outputs")), &mut Vec::new()).unwrap();

    // Target is nearly noise-free, so any shrinkage costs accuracy
    let first = report.points.first().unwrap().mse;
    let last = report.points.last().unwrap().mse;
    assert!(last > first);
    assert_eq!(report.best().unwrap().alpha, 0.0);
}

#[test]
fn test_arrays_found_in_separate_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("mount");
    write_diabetes_like(&data.join("x").join("deep"), &data.join("y"));

    let mut out = Vec::new();
    run_diabetes_job(&mut new_run(), &data, &job_config(&dir.path().join("outputs")), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 20);
}

#[test]
fn test_run_record_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    write_diabetes_like(&data, &data);
    let store = RunStore::new(dir.path().join("runs"));
    let mut run = new_run().with_store(store.clone());

    run_diabetes_job(&mut run, &data, &job_config(&dir.path().join("outputs")), &mut Vec::new()).unwrap();
    let record = run.complete().unwrap();

    let stored = store.load(&record.run_id).unwrap();
    assert_eq!(stored.status, RunStatus::Completed);
    assert_eq!(stored.metric_series("alpha").len(), 20);
}

#[test]
fn test_sweep_survives_duplicated_feature() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let base = Array2::from_shape_fn((50, 2), |_| rng.gen_range(-1.0..1.0));
    let x = Array2::from_shape_fn((50, 3), |(r, c)| if c == 2 { base[[r, 0]] } else { base[[r, c]] });
    let y = Array1::from_shape_fn(50, |r| 3.0 * base[[r, 0]] - base[[r, 1]] + rng.gen_range(-0.1..0.1));
    write_npy(data.join(FEATURES_FILE), &x).unwrap();
    write_npy(data.join(LABELS_FILE), &y).unwrap();

    let mut out = Vec::new();
    let report = run_diabetes_job(&mut new_run(), &data, &job_config(&dir.path().join("outputs")), &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 20);
    assert!(report.points.iter().all(|p| p.mse.is_finite()));
    // Noise is uniform in +-0.1, so the unpenalized fit lands near its variance
    assert!(report.points[0].mse < 0.1);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_labels_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    write_diabetes_like(&data, &data);
    std::fs::remove_file(data.join(LABELS_FILE)).unwrap();
    let outputs = dir.path().join("outputs");

    let mut out = Vec::new();
    let err = run_diabetes_job(&mut new_run(), &data, &job_config(&outputs), &mut out).unwrap_err();

    match err {
        TrainJobError::InputNotFound(msg) => assert!(msg.contains(LABELS_FILE)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(out.is_empty());
    assert_eq!(std::fs::read_dir(&outputs).unwrap().count(), 0);
}

#[test]
fn test_missing_data_folder() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_diabetes_job(
        &mut new_run(),
        &dir.path().join("absent"),
        &job_config(&dir.path().join("outputs")),
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(matches!(err, TrainJobError::InputNotFound(_)));
}

#[test]
fn test_row_count_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    write_npy(data.join(FEATURES_FILE), &Array2::<f64>::zeros((10, 3))).unwrap();
    write_npy(data.join(LABELS_FILE), &Array1::<f64>::zeros(9)).unwrap();

    let err = run_diabetes_job(&mut new_run(), &data, &job_config(&dir.path().join("outputs")), &mut Vec::new())
        .unwrap_err();
    assert!(matches!(err, TrainJobError::ShapeMismatch { .. }));
}
