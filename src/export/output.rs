//! Job output directory

use super::serializer::{save_model, ModelMetadata};
use crate::error::{Result, TrainJobError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory the platform collects as the job's artifacts
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Create the directory if missing; an existing directory is fine
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path).map_err(|e| {
            TrainJobError::Serialization(format!("cannot create output directory {}: {}", path.display(), e))
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `model` to `<dir>/<file_name>`, returning the written path
    pub fn save<M: Serialize>(&self, file_name: &str, model: &M, metadata: ModelMetadata) -> Result<PathBuf> {
        let target = self.path.join(file_name);
        save_model(model, &target, metadata)?;
        info!(path = %target.display(), "Saved model");
        Ok(target)
    }
}
