//! Input resolution and train/test splitting
//!
//! A job obtains its [`Dataset`] either from a named table served by the
//! run context ([`registry`]) or from `.npy` arrays found on disk ([`npy`]),
//! then partitions it with [`split::train_test_split`].

pub mod npy;
pub mod registry;
pub mod split;

pub use npy::{find_file, load_npy_dataset, FEATURES_FILE, LABELS_FILE};
pub use registry::{select_dataset, IRIS_FEATURES, IRIS_LABEL};
pub use split::{train_test_split, Split};

use crate::error::{Result, TrainJobError};
use ndarray::{Array1, Array2, Axis};

/// Labeled table of continuous features
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    targets: Array1<f64>,
    feature_names: Vec<String>,
    /// Label vocabulary for categorical targets; target `i` means `classes[i]`
    classes: Option<Vec<String>>,
}

impl Dataset {
    /// Build a dataset with positional feature names (`x0`, `x1`, ...)
    pub fn new(features: Array2<f64>, targets: Array1<f64>) -> Result<Self> {
        if features.nrows() != targets.len() {
            return Err(TrainJobError::ShapeMismatch {
                expected: format!("{} labels (one per feature row)", features.nrows()),
                actual: format!("{} labels", targets.len()),
            });
        }
        let feature_names = (0..features.ncols()).map(|i| format!("x{}", i)).collect();
        Ok(Self {
            features,
            targets,
            feature_names,
            classes: None,
        })
    }

    /// Name the feature columns
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.features.ncols() {
            return Err(TrainJobError::ShapeMismatch {
                expected: format!("{} feature names", self.features.ncols()),
                actual: format!("{} feature names", names.len()),
            });
        }
        self.feature_names = names;
        Ok(self)
    }

    /// Attach the label vocabulary of an encoded categorical target
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = Some(classes);
        self
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn classes(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }

    /// Rows at `indices`, in that order
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
            classes: self.classes.clone(),
        }
    }
}
