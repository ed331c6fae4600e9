//! Ridge-regression sweep on `.npy` diabetes arrays

use super::{Evaluation, Reporter, TrainingJob};
use crate::config::JobConfig;
use crate::data::{load_npy_dataset, train_test_split};
use crate::error::Result;
use crate::export::OutputDir;
use crate::tracking::RunContext;
use crate::training::{ridge_alphas, EstimatorConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One alpha of the sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub alpha: f64,
    pub mse: f64,
    pub artifact: PathBuf,
}

/// Outcome of the ridge sweep, in alpha order
#[derive(Debug, Clone, PartialEq)]
pub struct DiabetesReport {
    pub points: Vec<SweepPoint>,
}

impl DiabetesReport {
    /// Point with the lowest test MSE
    pub fn best(&self) -> Option<&SweepPoint> {
        self.points.iter().min_by(|a, b| a.mse.total_cmp(&b.mse))
    }
}

struct SweepReporter<'w, W: Write> {
    out: &'w mut W,
}

fn alpha_of(config: &EstimatorConfig) -> f64 {
    match config {
        EstimatorConfig::Ridge { alpha } => *alpha,
        EstimatorConfig::DecisionTree { .. } => f64::NAN,
    }
}

impl<W: Write> Reporter for SweepReporter<'_, W> {
    fn evaluated(&mut self, run: &mut dyn RunContext, config: &EstimatorConfig, evaluation: &Evaluation) -> Result<()> {
        run.log("alpha", alpha_of(config))?;
        run.log("mse", evaluation.test_score)
    }

    fn persisted(&mut self, config: &EstimatorConfig, evaluation: &Evaluation, _artifact: &Path) -> Result<()> {
        writeln!(
            self.out,
            "alpha is {:.2}, and mse is {:.2}",
            alpha_of(config),
            evaluation.test_score
        )?;
        Ok(())
    }
}

/// Load `features.npy`/`labels.npy` from beneath `data_folder` and fit one
/// ridge model per alpha in [`ridge_alphas`], logging `alpha` and `mse` for
/// each and writing `ridge_{alpha:.2}.pkl` files
pub fn run_diabetes_job<W: Write>(
    run: &mut dyn RunContext,
    data_folder: &Path,
    config: &JobConfig,
    out: &mut W,
) -> Result<DiabetesReport> {
    config.validate()?;
    let outputs = OutputDir::create(&config.outputs_dir)?;

    let dataset = load_npy_dataset(data_folder)?;
    let split = train_test_split(&dataset, config.test_size, config.diabetes_seed)?;
    info!(
        train = split.train.n_samples(),
        test = split.test.n_samples(),
        seed = config.diabetes_seed,
        "Split diabetes dataset"
    );

    let job = TrainingJob::new(&split, &outputs);
    let trained = job.run(
        ridge_alphas().map(EstimatorConfig::ridge),
        run,
        &mut SweepReporter { out },
    )?;

    let report = DiabetesReport {
        points: trained
            .into_iter()
            .map(|t| SweepPoint {
                alpha: alpha_of(&t.config),
                mse: t.evaluation.test_score,
                artifact: t.artifact,
            })
            .collect(),
    };
    if let Some(best) = report.best() {
        info!(alpha = best.alpha, mse = best.mse, "Best ridge model");
    }
    Ok(report)
}
