//! Run tracking
//!
//! The hosting platform is reached only through [`RunContext`]: fetch a named
//! input dataset, log a named scalar. Jobs receive the context as an explicit
//! argument. [`LocalRun`] implements it on the local filesystem: datasets come
//! from a [`DatasetRegistry`] and finished runs are written by a [`RunStore`].

mod registry;
mod run;
pub mod storage;

pub use registry::{DatasetRegistry, DirectoryRegistry, InMemoryRegistry};
pub use run::{LocalRun, MetricRecord, RunRecord, RunStatus};
pub use storage::RunStore;

use crate::error::Result;
use polars::prelude::DataFrame;
use std::path::Path;

/// Handle on the current job's run
pub trait RunContext {
    /// Fetch a named input dataset as a table
    fn input_dataset(&self, name: &str) -> Result<DataFrame>;

    /// Record a scalar metric. Logging the same key again extends its series.
    fn log(&mut self, key: &str, value: f64) -> Result<()>;

    /// Register a file produced by the run
    fn add_artifact(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
