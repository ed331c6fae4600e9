//! Job configuration

use crate::error::{Result, TrainJobError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fraction of rows held out for evaluation
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Fixed shuffle seed of the iris job
pub const IRIS_SEED: u64 = 223;

/// Fixed shuffle seed of the diabetes job
pub const DIABETES_SEED: u64 = 0;

/// Configuration shared by every training job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Directory collected by the platform as job artifacts
    pub outputs_dir: PathBuf,

    /// Root of the local dataset registry
    pub datasets_dir: PathBuf,

    /// Where finished run records are written
    pub runs_dir: PathBuf,

    /// Experiment name recorded on every run
    pub experiment: String,

    /// Held-out fraction for the train/test split
    pub test_size: f64,

    /// Split seed for the iris job
    pub iris_seed: u64,

    /// Split seed for the diabetes job
    pub diabetes_seed: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            outputs_dir: PathBuf::from("./outputs"),
            datasets_dir: PathBuf::from("./datasets"),
            runs_dir: PathBuf::from("./runs"),
            experiment: "trainjob".to_string(),
            test_size: DEFAULT_TEST_SIZE,
            iris_seed: IRIS_SEED,
            diabetes_seed: DIABETES_SEED,
        }
    }
}

impl JobConfig {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TrainJobError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| TrainJobError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_outputs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.outputs_dir = dir.into();
        self
    }

    pub fn with_datasets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.datasets_dir = dir.into();
        self
    }

    pub fn with_runs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.runs_dir = dir.into();
        self
    }

    pub fn with_experiment(mut self, name: impl Into<String>) -> Self {
        self.experiment = name.into();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Reject values the split cannot honour
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainJobError::InvalidParameter {
                name: "test_size".to_string(),
                value: self.test_size.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }
        if self.experiment.trim().is_empty() {
            return Err(TrainJobError::Config("experiment name is empty".to_string()));
        }
        Ok(())
    }
}
