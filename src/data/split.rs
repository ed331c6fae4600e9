//! Reproducible train/test splitting

use super::Dataset;
use crate::error::{Result, TrainJobError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// A train/test partition of one dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    /// Source-row indices of `train`
    pub train_indices: Vec<usize>,
    /// Source-row indices of `test`
    pub test_indices: Vec<usize>,
}

/// Shuffle the rows with a seeded ChaCha8 stream and hold out
/// `ceil(test_size * n)` of them.
///
/// The first test-count indices of the permutation form the test set and
/// the remainder the training set, so the same dataset and seed always give
/// the same partition. No stratification is applied.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<Split> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TrainJobError::InvalidParameter {
            name: "test_size".to_string(),
            value: test_size.to_string(),
            reason: "must lie strictly between 0 and 1".to_string(),
        });
    }

    let n_samples = dataset.n_samples();
    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(TrainJobError::InvalidParameter {
            name: "test_size".to_string(),
            value: test_size.to_string(),
            reason: format!("leaves an empty subset of {} rows", n_samples),
        });
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_indices = indices[..n_test].to_vec();
    let train_indices = indices[n_test..].to_vec();
    debug!(seed, n_train, n_test, "Split dataset");

    Ok(Split {
        train: dataset.select(&train_indices),
        test: dataset.select(&test_indices),
        train_indices,
        test_indices,
    })
}
