//! Loading feature/label arrays from `.npy` files

use super::Dataset;
use crate::error::{Result, TrainJobError};
use ndarray::{Array, Array1, Array2, Dimension};
use ndarray_npy::{read_npy, ReadNpyError, ReadableElement};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File holding the feature matrix
pub const FEATURES_FILE: &str = "features.npy";

/// File holding the label vector
pub const LABELS_FILE: &str = "labels.npy";

/// Recursively search `root` for a file named `file_name`.
///
/// Directories are walked depth-first with entries in lexicographic order,
/// and the files of a directory are checked before its subdirectories. The
/// first match wins.
pub fn find_file(root: impl AsRef<Path>, file_name: &str) -> Result<PathBuf> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(TrainJobError::InputNotFound(format!(
            "{} (data folder {} does not exist)",
            file_name,
            root.display()
        )));
    }

    search(root, file_name)?.ok_or_else(|| {
        TrainJobError::InputNotFound(format!("{} beneath {}", file_name, root.display()))
    })
}

fn search(dir: &Path, file_name: &str) -> Result<Option<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    let (dirs, files): (Vec<PathBuf>, Vec<PathBuf>) = entries.into_iter().partition(|p| p.is_dir());

    if let Some(found) = files
        .into_iter()
        .find(|p| p.file_name().map_or(false, |n| n == file_name))
    {
        return Ok(Some(found));
    }

    for sub in dirs {
        if let Some(found) = search(&sub, file_name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Locate and load `features.npy` (2-D) and `labels.npy` (1-D) beneath `root`
pub fn load_npy_dataset(root: impl AsRef<Path>) -> Result<Dataset> {
    let root = root.as_ref();
    let features_path = find_file(root, FEATURES_FILE)?;
    let labels_path = find_file(root, LABELS_FILE)?;
    debug!(features = %features_path.display(), labels = %labels_path.display(), "Found input arrays");

    let features: Array2<f64> = read_as_f64(&features_path)?;
    let labels: Array1<f64> = read_as_f64(&labels_path)?;

    let dataset = Dataset::new(features, labels)?;
    info!(
        rows = dataset.n_samples(),
        features = dataset.n_features(),
        root = %root.display(),
        "Loaded npy dataset"
    );
    Ok(dataset)
}

/// Read an array stored as f64, f32, i64 or i32 and widen it to f64
fn read_as_f64<D: Dimension>(path: &Path) -> Result<Array<f64, D>> {
    match read_widened::<D>(path) {
        Ok(Some(array)) => Ok(array),
        Ok(None) => Err(TrainJobError::Data(format!(
            "{}: unsupported dtype, expected float64, float32, int64 or int32",
            path.display()
        ))),
        Err(ReadNpyError::WrongNdim(expected, actual)) => Err(TrainJobError::ShapeMismatch {
            expected: match expected {
                Some(ndim) => format!("{}-D array in {}", ndim, path.display()),
                None => format!("array in {}", path.display()),
            },
            actual: format!("{}-D array", actual),
        }),
        Err(e) => Err(TrainJobError::Data(format!("{}: {}", path.display(), e))),
    }
}

fn read_widened<D: Dimension>(path: &Path) -> std::result::Result<Option<Array<f64, D>>, ReadNpyError> {
    if let Some(array) = try_read::<f64, D>(path, |v| v)? {
        return Ok(Some(array));
    }
    if let Some(array) = try_read::<f32, D>(path, f64::from)? {
        return Ok(Some(array));
    }
    if let Some(array) = try_read::<i64, D>(path, |v| v as f64)? {
        return Ok(Some(array));
    }
    try_read::<i32, D>(path, f64::from)
}

/// `Ok(None)` when the file holds another element type
fn try_read<T, D>(path: &Path, widen: impl Fn(T) -> f64) -> std::result::Result<Option<Array<f64, D>>, ReadNpyError>
where
    T: ReadableElement + Clone,
    D: Dimension,
{
    match read_npy::<_, Array<T, D>>(path) {
        Ok(array) => Ok(Some(array.mapv(widen))),
        Err(ReadNpyError::WrongDescriptor(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
