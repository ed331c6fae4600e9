//! Local run context

use super::{DatasetRegistry, RunContext, RunStore};
use crate::error::Result;
use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Run lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

/// One logged metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub key: String,
    pub value: f64,
    /// Position of this value within the key's series
    pub step: usize,
}

/// Everything recorded about a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub experiment: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub metrics: Vec<MetricRecord>,
    pub artifacts: Vec<String>,
    pub error: Option<String>,
}

impl RunRecord {
    /// Values logged under `key`, in logging order
    pub fn metric_series(&self, key: &str) -> Vec<f64> {
        self.metrics
            .iter()
            .filter(|m| m.key == key)
            .map(|m| m.value)
            .collect()
    }
}

/// Offline run: datasets from a registry, metrics kept in memory and written
/// to a [`RunStore`] when the run finishes
pub struct LocalRun {
    record: RunRecord,
    registry: Box<dyn DatasetRegistry>,
    store: Option<RunStore>,
    steps: HashMap<String, usize>,
}

impl LocalRun {
    pub fn start(experiment: impl Into<String>, registry: impl DatasetRegistry + 'static) -> Self {
        let record = RunRecord {
            run_id: Uuid::new_v4().to_string(),
            experiment: experiment.into(),
            started_at: Utc::now(),
            ended_at: None,
            status: RunStatus::Running,
            metrics: Vec::new(),
            artifacts: Vec::new(),
            error: None,
        };
        info!(run_id = %record.run_id, experiment = %record.experiment, "Run started");

        Self {
            record,
            registry: Box::new(registry),
            store: None,
            steps: HashMap::new(),
        }
    }

    /// Persist the run record here when it finishes
    pub fn with_store(mut self, store: RunStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn run_id(&self) -> &str {
        &self.record.run_id
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    pub fn metric_series(&self, key: &str) -> Vec<f64> {
        self.record.metric_series(key)
    }

    /// Mark the run completed and persist it
    pub fn complete(self) -> Result<RunRecord> {
        self.finish(RunStatus::Completed, None)
    }

    /// Mark the run failed with `reason` and persist it
    pub fn fail(self, reason: impl Into<String>) -> Result<RunRecord> {
        self.finish(RunStatus::Failed, Some(reason.into()))
    }

    fn finish(mut self, status: RunStatus, error: Option<String>) -> Result<RunRecord> {
        self.record.status = status;
        self.record.ended_at = Some(Utc::now());
        self.record.error = error;

        match status {
            RunStatus::Failed => warn!(
                run_id = %self.record.run_id,
                error = self.record.error.as_deref().unwrap_or(""),
                "Run failed"
            ),
            _ => info!(
                run_id = %self.record.run_id,
                metrics = self.record.metrics.len(),
                artifacts = self.record.artifacts.len(),
                "Run completed"
            ),
        }

        if let Some(store) = &self.store {
            store.save(&self.record)?;
        }
        Ok(self.record)
    }
}

impl RunContext for LocalRun {
    fn input_dataset(&self, name: &str) -> Result<DataFrame> {
        self.registry.get(name)
    }

    fn log(&mut self, key: &str, value: f64) -> Result<()> {
        let step = self.steps.entry(key.to_string()).or_insert(0);
        info!(run_id = %self.record.run_id, key, value, step = *step, "Logged metric");
        self.record.metrics.push(MetricRecord {
            key: key.to_string(),
            value,
            step: *step,
        });
        *step += 1;
        Ok(())
    }

    fn add_artifact(&mut self, path: &Path) -> Result<()> {
        self.record.artifacts.push(path.display().to_string());
        Ok(())
    }
}
