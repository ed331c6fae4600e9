//! Evaluation metrics

use crate::error::{Result, TrainJobError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metric an estimator is judged by on held-out rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Fraction of exactly matching labels
    Accuracy,
    /// Mean squared error
    MeanSquaredError,
}

impl Metric {
    /// Key the metric is logged under
    pub fn key(self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::MeanSquaredError => "mse",
        }
    }

    pub fn compute(self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
        match self {
            Metric::Accuracy => accuracy(y_true, y_pred),
            Metric::MeanSquaredError => mean_squared_error(y_true, y_pred),
        }
    }
}

fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(TrainJobError::ShapeMismatch {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(TrainJobError::Data("cannot score an empty set".to_string()));
    }
    Ok(())
}

/// Fraction of rows whose predicted label equals the true label
pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    Ok(sum / y_true.len() as f64)
}
