//! Model artifact format
//!
//! An artifact is a bincode-encoded [`SerializedModel`]: magic bytes, format
//! version, [`ModelMetadata`], the bincode bytes of the model, and an FNV-1a
//! checksum over those bytes.

use crate::error::{Result, TrainJobError};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Descriptive data stored next to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub model_type: String,
    pub trained_at: DateTime<Utc>,
    pub feature_names: Vec<String>,
    /// Label vocabulary of a classifier trained on encoded labels
    pub classes: Option<Vec<String>>,
    pub hyperparameters: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, f64>,
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>, model_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_type: model_type.into(),
            trained_at: Utc::now(),
            feature_names: Vec::new(),
            classes: None,
            hyperparameters: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.feature_names = features;
        self
    }

    pub fn with_classes(mut self, classes: Option<Vec<String>>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_hyperparameters(mut self, params: BTreeMap<String, String>) -> Self {
        self.hyperparameters = params;
        self
    }

    pub fn add_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializedModel {
    magic: [u8; 4],
    format_version: u32,
    metadata: ModelMetadata,
    model_data: Vec<u8>,
    checksum: u64,
}

impl SerializedModel {
    const MAGIC: [u8; 4] = *b"TJOB";
    const VERSION: u32 = 1;

    fn new(metadata: ModelMetadata, model_data: Vec<u8>) -> Self {
        let checksum = fnv1a(&model_data);
        Self {
            magic: Self::MAGIC,
            format_version: Self::VERSION,
            metadata,
            model_data,
            checksum,
        }
    }

    fn verify(&self) -> Result<()> {
        if self.magic != Self::MAGIC {
            return Err(TrainJobError::Serialization("not a trainjob model artifact".to_string()));
        }
        if self.format_version != Self::VERSION {
            return Err(TrainJobError::Serialization(format!(
                "unsupported artifact version {}",
                self.format_version
            )));
        }
        if fnv1a(&self.model_data) != self.checksum {
            return Err(TrainJobError::Serialization(
                "checksum verification failed, artifact may be corrupted".to_string(),
            ));
        }
        Ok(())
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    data.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
    })
}

/// Write `model` and its metadata to `path`
pub fn save_model<M: Serialize>(model: &M, path: impl AsRef<Path>, metadata: ModelMetadata) -> Result<()> {
    let path = path.as_ref();
    let model_data = bincode::serialize(model)
        .map_err(|e| TrainJobError::Serialization(format!("cannot encode model: {}", e)))?;
    let serialized = SerializedModel::new(metadata, model_data);

    let file = File::create(path).map_err(|e| {
        TrainJobError::Serialization(format!("cannot create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, &serialized)
        .map_err(|e| TrainJobError::Serialization(format!("cannot write {}: {}", path.display(), e)))?;
    writer
        .flush()
        .map_err(|e| TrainJobError::Serialization(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(())
}

/// Read back a model written by [`save_model`]
pub fn load_model<M: DeserializeOwned>(path: impl AsRef<Path>) -> Result<(M, ModelMetadata)> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| TrainJobError::InputNotFound(format!("{}: {}", path.display(), e)))?;

    let serialized: SerializedModel = bincode::deserialize_from(BufReader::new(file))
        .map_err(|e| TrainJobError::Serialization(format!("cannot decode {}: {}", path.display(), e)))?;
    serialized.verify()?;

    let model = bincode::deserialize(&serialized.model_data)?;
    Ok((model, serialized.metadata))
}

/// Read only the metadata of an artifact, still verifying its checksum
pub fn load_metadata(path: impl AsRef<Path>) -> Result<ModelMetadata> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| TrainJobError::InputNotFound(format!("{}: {}", path.display(), e)))?;
    let serialized: SerializedModel = bincode::deserialize_from(BufReader::new(file))
        .map_err(|e| TrainJobError::Serialization(format!("cannot decode {}: {}", path.display(), e)))?;
    serialized.verify()?;
    Ok(serialized.metadata)
}
