//! Dataset registries backing [`super::LocalRun`]

use crate::error::{Result, TrainJobError};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

/// Resolves a logical dataset name to a table
pub trait DatasetRegistry {
    fn get(&self, name: &str) -> Result<DataFrame>;
}

/// Registry of `<root>/<name>.csv` and `<root>/<name>.json` files
#[derive(Debug, Clone)]
pub struct DirectoryRegistry {
    root: PathBuf,
}

impl DirectoryRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl DatasetRegistry for DirectoryRegistry {
    fn get(&self, name: &str) -> Result<DataFrame> {
        let csv = self.root.join(format!("{}.csv", name));
        let json = self.root.join(format!("{}.json", name));

        let df = if csv.is_file() {
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(1000))
                .try_into_reader_with_file_path(Some(csv.clone()))?
                .finish()?
        } else if json.is_file() {
            JsonReader::new(File::open(&json)?).finish()?
        } else {
            return Err(TrainJobError::InputNotFound(format!(
                "dataset '{}' (no {}.csv or {}.json in {})",
                name,
                name,
                name,
                self.root.display()
            )));
        };

        info!(dataset = name, rows = df.height(), cols = df.width(), "Resolved dataset");
        Ok(df)
    }
}

/// Registry of frames registered in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    datasets: HashMap<String, DataFrame>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: impl Into<String>, df: DataFrame) -> Self {
        self.datasets.insert(name.into(), df);
        self
    }
}

impl DatasetRegistry for InMemoryRegistry {
    fn get(&self, name: &str) -> Result<DataFrame> {
        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| TrainJobError::InputNotFound(format!("dataset '{}'", name)))
    }
}
