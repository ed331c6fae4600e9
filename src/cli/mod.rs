//! trainjob CLI Module
//!
//! Command-line entry points for the two training jobs and for inspecting
//! saved model files.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::JobConfig;
use crate::error::Result;
use crate::export::{load_metadata, load_model};
use crate::pipeline::{run_diabetes_job, run_iris_job};
use crate::tracking::{DirectoryRegistry, LocalRun, RunStore};
use crate::training::FittedModel;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "trainjob")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Batch training jobs for a managed ML platform")]
#[command(long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory where model files are written
    #[arg(long, global = true, env = "TRAINJOB_OUTPUTS")]
    pub outputs: Option<PathBuf>,

    /// Root of the local dataset registry
    #[arg(long, global = true, env = "TRAINJOB_DATASETS")]
    pub datasets: Option<PathBuf>,

    /// Directory where run records are written
    #[arg(long, global = true, env = "TRAINJOB_RUNS")]
    pub runs: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a decision tree on the registry's iris dataset
    Iris,

    /// Sweep ridge regression over alphas on features.npy/labels.npy
    Diabetes {
        /// Folder searched recursively for the two .npy files
        #[arg(long)]
        data_folder: PathBuf,
    },

    /// Show the metadata stored in a model file
    Inspect {
        /// Model file written by one of the jobs
        #[arg(short, long)]
        model: PathBuf,
    },
}

impl GlobalArgs {
    /// File configuration with command-line overrides applied
    pub fn resolve(&self) -> Result<JobConfig> {
        let mut config = match &self.config {
            Some(path) => JobConfig::load(path)?,
            None => JobConfig::default(),
        };
        if let Some(dir) = &self.outputs {
            config = config.with_outputs_dir(dir);
        }
        if let Some(dir) = &self.datasets {
            config = config.with_datasets_dir(dir);
        }
        if let Some(dir) = &self.runs {
            config = config.with_runs_dir(dir);
        }
        config.validate()?;
        Ok(config)
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn start_run(config: &JobConfig) -> LocalRun {
    LocalRun::start(&config.experiment, DirectoryRegistry::new(&config.datasets_dir))
        .with_store(RunStore::new(&config.runs_dir))
}

/// Run `job` inside a tracked run; the run is marked failed if the job errors
fn tracked<T>(config: &JobConfig, job: impl FnOnce(&mut LocalRun) -> Result<T>) -> anyhow::Result<T> {
    let mut run = start_run(config);
    match job(&mut run) {
        Ok(value) => {
            run.complete()?;
            Ok(value)
        }
        Err(e) => {
            let reason = e.to_string();
            if let Err(store_err) = run.fail(reason) {
                tracing::warn!(error = %store_err, "Could not persist failed run");
            }
            Err(e.into())
        }
    }
}

/// Run the iris decision-tree job
pub fn cmd_iris(global: &GlobalArgs) -> anyhow::Result<()> {
    let config = global.resolve()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    tracked(&config, |run| run_iris_job(run, &config, &mut out)).context("iris job failed")?;
    out.flush()?;
    Ok(())
}

/// Run the diabetes ridge sweep
pub fn cmd_diabetes(global: &GlobalArgs, data_folder: &Path) -> anyhow::Result<()> {
    let config = global.resolve()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    tracked(&config, |run| run_diabetes_job(run, data_folder, &config, &mut out))
        .with_context(|| format!("diabetes job failed on {}", data_folder.display()))?;
    out.flush()?;
    Ok(())
}

/// Print the metadata of a saved model
pub fn cmd_inspect(model_path: &Path) -> anyhow::Result<()> {
    let metadata = load_metadata(model_path)
        .with_context(|| format!("cannot read model file {}", model_path.display()))?;
    let (model, _) = load_model::<FittedModel>(model_path)
        .with_context(|| format!("{} does not hold a trainjob model", model_path.display()))?;

    section("Model");
    println!("  {:<16} {}", muted("File"), model_path.display());
    println!("  {:<16} {}", muted("Name"), metadata.name.white().bold());
    println!("  {:<16} {}", muted("Type"), metadata.model_type);
    println!("  {:<16} {}", muted("Trained"), metadata.trained_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  {:<16} {}", muted("Features"), metadata.feature_names.join(", "));
    if let Some(classes) = &metadata.classes {
        println!("  {:<16} {}", muted("Classes"), classes.join(", "));
    }

    if !metadata.hyperparameters.is_empty() {
        section("Hyperparameters");
        for (key, value) in &metadata.hyperparameters {
            println!("  {:<16} {}", muted(key), value);
        }
    }

    if !metadata.metrics.is_empty() {
        section("Metrics");
        for (key, value) in &metadata.metrics {
            println!("  {:<16} {}", muted(key), format!("{:.4}", value).white().bold());
        }
    }

    section("Structure");
    match &model {
        FittedModel::DecisionTreeClassifier(tree) => {
            println!("  {:<16} {}", muted("Depth"), tree.get_depth());
            println!("  {:<16} {}", muted("Leaves"), tree.get_n_leaves());
        }
        FittedModel::Ridge(ridge) => {
            println!("  {:<16} {}", muted("Alpha"), ridge.alpha);
            if let Some(coefficients) = &ridge.coefficients {
                let shown: Vec<String> = coefficients.iter().map(|c| format!("{:.4}", c)).collect();
                println!("  {:<16} {}", muted("Coefficients"), shown.join(" "));
            }
            if let Some(intercept) = ridge.intercept {
                println!("  {:<16} {:.4}", muted("Intercept"), intercept);
            }
        }
    }
    println!();

    Ok(())
}
