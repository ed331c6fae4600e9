//! trainjob - Batch training jobs for a managed ML platform
//!
//! Two jobs are provided:
//! - the iris job fetches the registry dataset `iris`, trains a decision tree
//!   and reports train/test accuracy
//! - the diabetes job finds `features.npy`/`labels.npy` under a data folder
//!   and sweeps ridge regression over twenty alphas, logging `alpha` and `mse`
//!
//! Each job writes its fitted models into an outputs directory.
//!
//! # Modules
//!
//! - [`data`] - Dataset loading and the seeded train/test split
//! - [`training`] - Decision tree, ridge regression, metrics
//! - [`pipeline`] - The train/evaluate/persist pipeline and both jobs
//! - [`tracking`] - Run context: named input datasets and metric logging
//! - [`export`] - Model files with metadata
//! - [`config`] - Job configuration
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;
pub mod config;

// Jobs
pub mod data;
pub mod training;
pub mod pipeline;

// Platform
pub mod tracking;
pub mod export;

// Services
pub mod cli;

pub use error::{Result, TrainJobError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, TrainJobError};

    // Configuration
    pub use crate::config::JobConfig;

    // Data
    pub use crate::data::{load_npy_dataset, select_dataset, train_test_split, Dataset, Split};

    // Training
    pub use crate::training::{DecisionTree, EstimatorConfig, FittedModel, Metric, RidgeRegression};

    // Jobs
    pub use crate::pipeline::{run_diabetes_job, run_iris_job, DiabetesReport, IrisReport, TrainingJob};

    // Run tracking
    pub use crate::tracking::{DatasetRegistry, DirectoryRegistry, InMemoryRegistry, LocalRun, RunContext, RunStore};

    // Export
    pub use crate::export::{load_model, save_model, ModelMetadata, OutputDir};
}
