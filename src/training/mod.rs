//! Model training
//!
//! Provides the estimators the jobs fit:
//! - Decision tree classifier (CART)
//! - Ridge regression, swept over [`ridge_alphas`]
//!
//! An [`EstimatorConfig`] names an algorithm and its hyperparameters;
//! fitting it on a training set yields an immutable [`FittedModel`].

pub mod decision_tree;
pub mod metrics;
pub mod ridge;

pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use metrics::{accuracy, mean_squared_error, Metric};
pub use ridge::RidgeRegression;

use crate::data::Dataset;
use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

/// Number of regularization strengths in the ridge sweep
pub const RIDGE_SWEEP_LEN: usize = 20;

/// Step between consecutive ridge alphas
pub const RIDGE_ALPHA_STEP: f64 = 0.05;

/// `0.00, 0.05, ..., 0.95`: twenty alphas from zero up to but excluding one
pub fn ridge_alphas() -> impl Iterator<Item = f64> + Clone {
    (0..RIDGE_SWEEP_LEN).map(|i| i as f64 * RIDGE_ALPHA_STEP)
}

/// Algorithm identity plus hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EstimatorConfig {
    DecisionTree {
        max_depth: Option<usize>,
        criterion: Criterion,
    },
    Ridge {
        alpha: f64,
    },
}

impl EstimatorConfig {
    /// Unconstrained Gini tree
    pub fn decision_tree() -> Self {
        EstimatorConfig::DecisionTree {
            max_depth: None,
            criterion: Criterion::Gini,
        }
    }

    pub fn ridge(alpha: f64) -> Self {
        EstimatorConfig::Ridge { alpha }
    }

    pub fn model_type(&self) -> &'static str {
        match self {
            EstimatorConfig::DecisionTree { .. } => "decision_tree",
            EstimatorConfig::Ridge { .. } => "ridge",
        }
    }

    /// File name the fitted model is persisted under
    pub fn artifact_name(&self) -> String {
        match self {
            EstimatorConfig::DecisionTree { .. } => "decision_tree.pkl".to_string(),
            EstimatorConfig::Ridge { alpha } => format!("ridge_{:.2}.pkl", alpha),
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            EstimatorConfig::DecisionTree { .. } => Metric::Accuracy,
            EstimatorConfig::Ridge { .. } => Metric::MeanSquaredError,
        }
    }

    pub fn hyperparameters(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        match self {
            EstimatorConfig::DecisionTree { max_depth, criterion } => {
                let depth = max_depth.map_or_else(|| "none".to_string(), |d| d.to_string());
                params.insert("max_depth".to_string(), depth);
                params.insert("criterion".to_string(), criterion.as_str().to_string());
            }
            EstimatorConfig::Ridge { alpha } => {
                params.insert("alpha".to_string(), alpha.to_string());
            }
        }
        params
    }

    /// Train the configured algorithm on `train`
    pub fn fit(&self, train: &Dataset) -> Result<FittedModel> {
        let start = Instant::now();
        let model = match self {
            EstimatorConfig::DecisionTree { max_depth, criterion } => {
                let mut tree = DecisionTree::new()
                    .with_max_depth(*max_depth)
                    .with_criterion(*criterion);
                tree.fit(train.features(), train.targets())?;
                FittedModel::DecisionTreeClassifier(tree)
            }
            EstimatorConfig::Ridge { alpha } => {
                let mut ridge = RidgeRegression::new(*alpha);
                ridge.fit(train.features(), train.targets())?;
                FittedModel::Ridge(ridge)
            }
        };
        debug!(
            model = self.model_type(),
            rows = train.n_samples(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fitted estimator"
        );
        Ok(model)
    }
}

/// A trained model; never mutated after fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FittedModel {
    DecisionTreeClassifier(DecisionTree),
    Ridge(RidgeRegression),
}

impl FittedModel {
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            FittedModel::DecisionTreeClassifier(tree) => tree.predict(x),
            FittedModel::Ridge(ridge) => ridge.predict(x),
        }
    }

    /// Score the model against a dataset with `metric`
    pub fn evaluate(&self, metric: Metric, data: &Dataset) -> Result<f64> {
        let predictions = self.predict(data.features())?;
        metric.compute(data.targets(), &predictions)
    }

    pub fn model_type(&self) -> &'static str {
        match self {
            FittedModel::DecisionTreeClassifier(_) => "decision_tree",
            FittedModel::Ridge(_) => "ridge",
        }
    }
}
