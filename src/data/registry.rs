//! Column selection from registry tables

use super::Dataset;
use crate::error::{Result, TrainJobError};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

/// Feature columns of the iris table
pub const IRIS_FEATURES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Label column of the iris table
pub const IRIS_LABEL: &str = "species";

/// Select named feature columns and one label column from a table.
///
/// Features are cast to `f64`. A string label column is label-encoded:
/// classes are sorted, and each row's target is the index of its class.
/// A numeric label column is used as-is.
pub fn select_dataset(df: &DataFrame, feature_columns: &[&str], label_column: &str) -> Result<Dataset> {
    let features = columns_to_array2(df, feature_columns)?;

    let label = df
        .column(label_column)
        .map_err(|_| TrainJobError::InputNotFound(format!("label column '{}'", label_column)))?;

    let dataset = match label.dtype() {
        DataType::String => {
            let (targets, classes) = encode_labels(label, label_column)?;
            Dataset::new(features, targets)?.with_classes(classes)
        }
        _ => Dataset::new(features, column_to_f64(label, label_column)?)?,
    };

    debug!(
        rows = dataset.n_samples(),
        features = dataset.n_features(),
        label = label_column,
        "Selected dataset columns"
    );
    dataset.with_feature_names(feature_columns.iter().map(|c| c.to_string()).collect())
}

fn columns_to_array2(df: &DataFrame, col_names: &[&str]) -> Result<Array2<f64>> {
    let col_data: Vec<Array1<f64>> = col_names
        .iter()
        .map(|&name| {
            let column = df
                .column(name)
                .map_err(|_| TrainJobError::InputNotFound(format!("feature column '{}'", name)))?;
            column_to_f64(column, name)
        })
        .collect::<Result<_>>()?;

    Ok(Array2::from_shape_fn((df.height(), col_names.len()), |(r, c)| col_data[c][r]))
}

fn column_to_f64(column: &Column, name: &str) -> Result<Array1<f64>> {
    let cast = column
        .cast(&DataType::Float64)
        .map_err(|e| TrainJobError::Data(format!("column '{}' is not numeric: {}", name, e)))?;
    cast.f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| TrainJobError::Data(format!("column '{}' has a null at row {}", name, row)))
        })
        .collect()
}

fn encode_labels(column: &Column, name: &str) -> Result<(Array1<f64>, Vec<String>)> {
    let as_str = column.cast(&DataType::String)?;
    let values: Vec<&str> = as_str
        .as_materialized_series()
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| TrainJobError::Data(format!("column '{}' has a null at row {}", name, row)))
        })
        .collect::<Result<_>>()?;

    let classes: Vec<String> = values
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let targets = values
        .iter()
        .map(|v| classes.binary_search_by(|c| c.as_str().cmp(v)).unwrap_or(0) as f64)
        .collect();

    Ok((targets, classes))
}
