//! Dataset loading and coercion
//!
//! Reads the raw CSV, checks it against the feature schema, and reduces it
//! to typed training records. Numeric coercion failures become missing
//! values for the imputers to handle; they are never row-level failures.

use crate::error::{PricerError, Result};
use crate::schema::{
    self, FeatureRecord, FeatureValue, CATEGORICAL_COLUMNS, FEATURE_COLUMNS, NUMERIC_COLUMNS,
    TARGET_COLUMN,
};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Rows reduced to feature records plus their targets.
///
/// Rows whose target failed numeric coercion are dropped here: features are
/// imputable, the target is not.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub records: Vec<FeatureRecord>,
    pub targets: Vec<f64>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load a CSV dataset. A missing file is a configuration error, fatal at
/// training time.
pub fn load(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        PricerError::DataError(format!("cannot open dataset {}: {e}", path.display()))
    })?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| PricerError::DataError(e.to_string()))?;

    debug!(rows = df.height(), cols = df.width(), "loaded dataset");
    Ok(df)
}

/// Validate the dataset against the schema, select the declared columns,
/// and coerce numeric columns (non-strict, failures become nulls).
pub fn prepare(df: &DataFrame) -> Result<DataFrame> {
    schema::validate(df)?;

    let mut selected: Vec<&str> = FEATURE_COLUMNS.to_vec();
    selected.push(TARGET_COLUMN);
    let mut result = df.select(selected)?;

    for col_name in NUMERIC_COLUMNS.iter().chain(std::iter::once(&TARGET_COLUMN)).copied() {
        let casted = result.column(col_name)?.cast(&DataType::Float64)?;
        result.with_column(casted)?;
    }
    for col_name in CATEGORICAL_COLUMNS {
        let casted = result.column(col_name)?.cast(&DataType::String)?;
        result.with_column(casted)?;
    }

    Ok(result)
}

/// Reduce a prepared dataset to typed records plus targets.
pub fn to_training_set(df: &DataFrame) -> Result<TrainingSet> {
    let n_rows = df.height();

    // Pull each feature column out once, in schema order.
    let mut columns: Vec<ColumnValues> = Vec::with_capacity(FEATURE_COLUMNS.len());
    for col_name in FEATURE_COLUMNS {
        columns.push(extract_column(df, col_name)?);
    }

    let target_column = df.column(TARGET_COLUMN)?;
    let target_ca = target_column
        .as_materialized_series()
        .f64()
        .map_err(|e| PricerError::DataError(e.to_string()))?;
    let targets_raw: Vec<Option<f64>> = target_ca.into_iter().collect();

    let mut records = Vec::with_capacity(n_rows);
    let mut targets = Vec::with_capacity(n_rows);
    let mut dropped = 0usize;

    for row in 0..n_rows {
        let Some(target) = targets_raw[row] else {
            dropped += 1;
            continue;
        };

        let values: Vec<FeatureValue> = columns.iter().map(|col| col.value_at(row)).collect();
        records.push(FeatureRecord::new(values)?);
        targets.push(target);
    }

    if dropped > 0 {
        debug!(dropped, "dropped rows with missing target");
    }

    if records.is_empty() {
        return Err(PricerError::DataError(
            "dataset has no rows with a usable target value".to_string(),
        ));
    }

    Ok(TrainingSet { records, targets })
}

/// Load, validate, and reduce in one step (the training entry path).
pub fn load_training_set(path: impl AsRef<Path>) -> Result<TrainingSet> {
    let df = load(path)?;
    let prepared = prepare(&df)?;
    to_training_set(&prepared)
}

enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    fn value_at(&self, row: usize) -> FeatureValue {
        match self {
            ColumnValues::Numeric(vals) => FeatureValue::Numeric(vals[row]),
            ColumnValues::Categorical(vals) => FeatureValue::Categorical(vals[row].clone()),
        }
    }
}

fn extract_column(df: &DataFrame, col_name: &str) -> Result<ColumnValues> {
    let column = df
        .column(col_name)
        .map_err(|_| PricerError::FeatureNotFound(col_name.to_string()))?;
    let series = column.as_materialized_series();

    if schema::is_numeric(col_name) {
        let ca = series
            .f64()
            .map_err(|e| PricerError::DataError(e.to_string()))?;
        Ok(ColumnValues::Numeric(ca.into_iter().collect()))
    } else {
        let ca = series
            .str()
            .map_err(|e| PricerError::DataError(e.to_string()))?;
        Ok(ColumnValues::Categorical(
            ca.into_iter().map(|v| v.map(|s| s.to_string())).collect(),
        ))
    }
}
