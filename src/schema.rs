//! Feature schema: the fixed set of input columns and the target
//!
//! Column order is load-bearing. The fitted transformer addresses columns
//! positionally within each group (numeric block, then one indicator block
//! per categorical column), so every record handed to it must follow
//! [`FEATURE_COLUMNS`] order exactly.

use crate::error::{PricerError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Target column name
pub const TARGET_COLUMN: &str = "Price";

/// All feature columns, in declaration order
pub const FEATURE_COLUMNS: [&str; 9] = [
    "Company",
    "TypeName",
    "Inches",
    "CPU_Company",
    "CPU_Frequency",
    "RAM",
    "Memory",
    "Weight",
    "OpSys",
];

/// Numeric feature columns (median-imputed, no scaling)
pub const NUMERIC_COLUMNS: [&str; 4] = ["Inches", "CPU_Frequency", "RAM", "Weight"];

/// Categorical feature columns (mode-imputed, one-hot encoded)
pub const CATEGORICAL_COLUMNS: [&str; 5] = ["Company", "TypeName", "CPU_Company", "Memory", "OpSys"];

/// Column the catalog groups by
pub const GROUP_COLUMN: &str = "Company";

/// Product-name column, used by the catalog only
pub const PRODUCT_COLUMN: &str = "Product";

/// Type-name column, shared between the model and the catalog
pub const TYPE_COLUMN: &str = "TypeName";

/// Whether a declared feature column is numeric
pub fn is_numeric(column: &str) -> bool {
    NUMERIC_COLUMNS.contains(&column)
}

/// Validate that a dataset carries every feature column and the target.
///
/// Reports all missing columns at once, before any fitting work begins.
pub fn validate(df: &DataFrame) -> Result<()> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<&str> = FEATURE_COLUMNS
        .iter()
        .chain(std::iter::once(&TARGET_COLUMN))
        .filter(|c| !present.iter().any(|p| p == *c))
        .copied()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PricerError::DataError(format!(
            "dataset is missing required columns: {}",
            missing.join(", ")
        )))
    }
}

/// A single feature value, tagged by column type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    /// Numeric value; `None` means missing (imputed at transform time)
    Numeric(Option<f64>),
    /// Categorical string; `None` means missing (imputed at transform time)
    Categorical(Option<String>),
}

impl FeatureValue {
    /// A categorical value from anything string-like, treating empty as missing
    pub fn categorical(value: impl Into<String>) -> Self {
        let s = value.into();
        if s.trim().is_empty() {
            FeatureValue::Categorical(None)
        } else {
            FeatureValue::Categorical(Some(s))
        }
    }

    /// A present numeric value
    pub fn numeric(value: f64) -> Self {
        FeatureValue::Numeric(Some(value))
    }
}

/// One row of input, aligned to [`FEATURE_COLUMNS`] order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    values: Vec<FeatureValue>,
}

impl FeatureRecord {
    /// Build a record from values already in schema order.
    ///
    /// Rejects records whose length or per-column value types disagree with
    /// the schema.
    pub fn new(values: Vec<FeatureValue>) -> Result<Self> {
        if values.len() != FEATURE_COLUMNS.len() {
            return Err(PricerError::ShapeError {
                expected: format!("{} feature values", FEATURE_COLUMNS.len()),
                actual: format!("{} feature values", values.len()),
            });
        }

        for (column, value) in FEATURE_COLUMNS.iter().zip(values.iter()) {
            let ok = match value {
                FeatureValue::Numeric(_) => is_numeric(column),
                FeatureValue::Categorical(_) => !is_numeric(column),
            };
            if !ok {
                return Err(PricerError::ShapeError {
                    expected: format!(
                        "{} value for column {column}",
                        if is_numeric(column) { "numeric" } else { "categorical" }
                    ),
                    actual: format!("{value:?}"),
                });
            }
        }

        Ok(Self { values })
    }

    /// Build a record from (column, value) pairs in any order.
    ///
    /// Every declared feature column must be present; extra pairs are
    /// rejected as a shape mismatch.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, FeatureValue)>,
    {
        let mut slots: Vec<Option<FeatureValue>> = vec![None; FEATURE_COLUMNS.len()];

        for (name, value) in pairs {
            let idx = FEATURE_COLUMNS
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| PricerError::ShapeError {
                    expected: format!("one of: {}", FEATURE_COLUMNS.join(", ")),
                    actual: name.clone(),
                })?;
            slots[idx] = Some(value);
        }

        let mut values = Vec::with_capacity(slots.len());
        for (column, slot) in FEATURE_COLUMNS.iter().zip(slots) {
            match slot {
                Some(value) => values.push(value),
                None => return Err(PricerError::FeatureNotFound(column.to_string())),
            }
        }

        Self::new(values)
    }

    /// Value at a schema position
    pub fn value(&self, idx: usize) -> &FeatureValue {
        &self.values[idx]
    }

    /// Value for a named column
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|idx| &self.values[idx])
    }
}
