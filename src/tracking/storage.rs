//! Storage for finished run records
//!
//! One pretty-printed JSON file per run, named `<run_id>.json`.

use super::RunRecord;
use crate::error::{Result, TrainJobError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local file system store for run records
#[derive(Debug, Clone)]
pub struct RunStore {
    base_dir: PathBuf,
}

impl RunStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record_path(&self, run_id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", run_id))
    }

    /// Write `record`, replacing any earlier version of the same run
    pub fn save(&self, record: &RunRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_dir)?;
        let path = self.record_path(&record.run_id);

        let file = File::create(&path).map_err(|e| {
            TrainJobError::Serialization(format!("cannot create {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record).map_err(|e| {
            TrainJobError::Serialization(format!("cannot write {}: {}", path.display(), e))
        })?;
        writer.flush().map_err(|e| {
            TrainJobError::Serialization(format!("cannot write {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Saved run record");
        Ok(path)
    }

    pub fn load(&self, run_id: &str) -> Result<RunRecord> {
        let path = self.record_path(run_id);
        if !path.is_file() {
            return Err(TrainJobError::InputNotFound(format!("run record {}", path.display())));
        }
        let reader = BufReader::new(File::open(&path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// All stored runs, oldest first
    pub fn list(&self) -> Result<Vec<RunRecord>> {
        if !self.base_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |e| e == "json") {
                let reader = BufReader::new(File::open(&path)?);
                records.push(serde_json::from_reader::<_, RunRecord>(reader)?);
            }
        }
        records.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        Ok(records)
    }
}
