//! Train/evaluate/persist pipeline
//!
//! Both jobs share one shape: resolve a dataset, split it, then for each
//! estimator configuration fit on the training rows, score on both subsets,
//! report, and persist the model. [`TrainingJob`] runs the per-configuration
//! part; a [`Reporter`] decides what each job prints and logs.

pub mod diabetes;
pub mod iris;

pub use diabetes::{run_diabetes_job, DiabetesReport, SweepPoint};
pub use iris::{run_iris_job, IrisReport, IRIS_DATASET};

use crate::data::Split;
use crate::error::Result;
use crate::export::{ModelMetadata, OutputDir};
use crate::tracking::RunContext;
use crate::training::{EstimatorConfig, FittedModel, Metric};
use std::path::{Path, PathBuf};
use tracing::info;

/// Scores of one fitted model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub metric: Metric,
    pub train_score: f64,
    pub test_score: f64,
}

/// A configuration that went through every stage
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub config: EstimatorConfig,
    pub model: FittedModel,
    pub evaluation: Evaluation,
    pub artifact: PathBuf,
}

/// Job-specific reporting hooks
pub trait Reporter {
    /// Called once a model is scored, before it is persisted
    fn evaluated(
        &mut self,
        run: &mut dyn RunContext,
        config: &EstimatorConfig,
        evaluation: &Evaluation,
    ) -> Result<()>;

    /// Called once the model file is written
    fn persisted(&mut self, _config: &EstimatorConfig, _evaluation: &Evaluation, _artifact: &Path) -> Result<()> {
        Ok(())
    }
}

/// Runs estimator configurations against one split
pub struct TrainingJob<'a> {
    split: &'a Split,
    outputs: &'a OutputDir,
}

impl<'a> TrainingJob<'a> {
    pub fn new(split: &'a Split, outputs: &'a OutputDir) -> Self {
        Self { split, outputs }
    }

    /// Fit, evaluate, report and persist each configuration in order.
    ///
    /// The first failure aborts the remaining configurations; artifacts
    /// already written stay on disk.
    pub fn run<R: Reporter>(
        &self,
        configs: impl IntoIterator<Item = EstimatorConfig>,
        run: &mut dyn RunContext,
        reporter: &mut R,
    ) -> Result<Vec<TrainedModel>> {
        let mut trained = Vec::new();
        for config in configs {
            trained.push(self.run_one(config, run, reporter)?);
        }
        Ok(trained)
    }

    fn run_one<R: Reporter>(
        &self,
        config: EstimatorConfig,
        run: &mut dyn RunContext,
        reporter: &mut R,
    ) -> Result<TrainedModel> {
        let model = config.fit(&self.split.train)?;

        let metric = config.metric();
        let evaluation = Evaluation {
            metric,
            train_score: model.evaluate(metric, &self.split.train)?,
            test_score: model.evaluate(metric, &self.split.test)?,
        };
        info!(
            model = config.model_type(),
            metric = metric.key(),
            train = evaluation.train_score,
            test = evaluation.test_score,
            "Evaluated model"
        );
        reporter.evaluated(run, &config, &evaluation)?;

        let file_name = config.artifact_name();
        let metadata = ModelMetadata::new(file_name.trim_end_matches(".pkl"), config.model_type())
            .with_features(self.split.train.feature_names().to_vec())
            .with_classes(self.split.train.classes().map(<[String]>::to_vec))
            .with_hyperparameters(config.hyperparameters())
            .add_metric(format!("train_{}", metric.key()), evaluation.train_score)
            .add_metric(format!("test_{}", metric.key()), evaluation.test_score);

        let artifact = self.outputs.save(&file_name, &model, metadata)?;
        run.add_artifact(&artifact)?;
        reporter.persisted(&config, &evaluation, &artifact)?;

        Ok(TrainedModel {
            config,
            model,
            evaluation,
            artifact,
        })
    }
}
