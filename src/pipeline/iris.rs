//! Decision-tree job on the registry's iris dataset

use super::{Evaluation, Reporter, TrainingJob};
use crate::config::JobConfig;
use crate::data::{select_dataset, train_test_split, IRIS_FEATURES, IRIS_LABEL};
use crate::error::{Result, TrainJobError};
use crate::export::OutputDir;
use crate::tracking::RunContext;
use crate::training::EstimatorConfig;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Registry name of the input dataset
pub const IRIS_DATASET: &str = "iris";

/// Outcome of the iris job
#[derive(Debug, Clone, PartialEq)]
pub struct IrisReport {
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub artifact: PathBuf,
}

struct AccuracyPrinter<'w, W: Write> {
    out: &'w mut W,
}

impl<W: Write> Reporter for AccuracyPrinter<'_, W> {
    fn evaluated(&mut self, _run: &mut dyn RunContext, _config: &EstimatorConfig, evaluation: &Evaluation) -> Result<()> {
        writeln!(
            self.out,
            "Accuracy of Decision Tree classifier on training set: {:.2}",
            evaluation.train_score
        )?;
        writeln!(
            self.out,
            "Accuracy of Decision Tree classifier on test set: {:.2}",
            evaluation.test_score
        )?;
        Ok(())
    }
}

/// Fetch `iris` through `run`, train one unconstrained decision tree and
/// write `decision_tree.pkl` into the outputs directory
pub fn run_iris_job<W: Write>(run: &mut dyn RunContext, config: &JobConfig, out: &mut W) -> Result<IrisReport> {
    config.validate()?;

    let df = run.input_dataset(IRIS_DATASET)?;
    let dataset = select_dataset(&df, &IRIS_FEATURES, IRIS_LABEL)?;
    let split = train_test_split(&dataset, config.test_size, config.iris_seed)?;
    info!(
        train = split.train.n_samples(),
        test = split.test.n_samples(),
        seed = config.iris_seed,
        "Split iris dataset"
    );

    let outputs = OutputDir::create(&config.outputs_dir)?;
    let job = TrainingJob::new(&split, &outputs);
    let mut trained = job.run(
        [EstimatorConfig::decision_tree()],
        run,
        &mut AccuracyPrinter { out },
    )?;

    let tree = trained
        .pop()
        .ok_or_else(|| TrainJobError::Training("decision tree produced no model".to_string()))?;
    Ok(IrisReport {
        train_accuracy: tree.evaluation.train_score,
        test_accuracy: tree.evaluation.test_score,
        artifact: tree.artifact,
    })
}
