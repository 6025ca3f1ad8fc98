//! Column-wise transformer composition
//!
//! Output layout is positional: the numeric columns in schema order, then
//! one indicator block per categorical column in schema order. The fitted
//! state (imputation statistics plus vocabularies) is serialized as part of
//! the pipeline artifact and reused unchanged for every prediction.

use crate::error::{PricerError, Result};
use crate::preprocessing::{CategoricalImputer, ChoiceManifest, NumericImputer, OneHotEncoder};
use crate::schema::{FeatureRecord, FeatureValue, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Composed per-type transformer over the feature schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric_imputer: Option<NumericImputer>,
    categorical_imputer: Option<CategoricalImputer>,
    encoder: Option<OneHotEncoder>,
    is_fitted: bool,
}

impl ColumnTransformer {
    /// A transformer over the declared feature schema.
    pub fn new() -> Self {
        Self {
            numeric_columns: NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect(),
            categorical_columns: CATEGORICAL_COLUMNS.iter().map(|s| s.to_string()).collect(),
            numeric_imputer: None,
            categorical_imputer: None,
            encoder: None,
            is_fitted: false,
        }
    }

    /// Learn imputation statistics and vocabularies from training records.
    pub fn fit(&mut self, records: &[FeatureRecord]) -> Result<&mut Self> {
        if records.is_empty() {
            return Err(PricerError::PreprocessingError(
                "cannot fit a transformer on zero records".to_string(),
            ));
        }

        let numeric: Vec<(String, Vec<Option<f64>>)> = self
            .numeric_columns
            .iter()
            .map(|col| Ok((col.clone(), numeric_column(records, col)?)))
            .collect::<Result<_>>()?;

        let categorical: Vec<(String, Vec<Option<String>>)> = self
            .categorical_columns
            .iter()
            .map(|col| Ok((col.clone(), categorical_column(records, col)?)))
            .collect::<Result<_>>()?;

        let mut numeric_imputer = NumericImputer::new();
        numeric_imputer.fit(numeric.iter().map(|(n, v)| (n.as_str(), v.as_slice())))?;

        let mut categorical_imputer = CategoricalImputer::new();
        categorical_imputer.fit(categorical.iter().map(|(n, v)| (n.as_str(), v.as_slice())))?;

        let mut encoder = OneHotEncoder::new();
        encoder.fit(categorical.iter().map(|(n, v)| (n.as_str(), v.as_slice())))?;

        self.numeric_imputer = Some(numeric_imputer);
        self.categorical_imputer = Some(categorical_imputer);
        self.encoder = Some(encoder);
        self.is_fitted = true;
        Ok(self)
    }

    /// Transform a single record into a feature vector, without refitting.
    pub fn transform_record(&self, record: &FeatureRecord) -> Result<Array1<f64>> {
        let mut out = Vec::with_capacity(self.n_output_features()?);
        self.encode_record_into(record, &mut out)?;
        Ok(Array1::from_vec(out))
    }

    /// Transform a batch of records into a feature matrix.
    pub fn transform(&self, records: &[FeatureRecord]) -> Result<Array2<f64>> {
        let width = self.n_output_features()?;
        let mut flat = Vec::with_capacity(records.len() * width);
        for record in records {
            self.encode_record_into(record, &mut flat)?;
        }

        Array2::from_shape_vec((records.len(), width), flat).map_err(|e| PricerError::ShapeError {
            expected: format!("({}, {width})", records.len()),
            actual: e.to_string(),
        })
    }

    /// Width of the transformed feature vector.
    pub fn n_output_features(&self) -> Result<usize> {
        let encoder = self.encoder()?;
        let mut width = self.numeric_columns.len();
        for col in &self.categorical_columns {
            width += encoder.width(col)?;
        }
        Ok(width)
    }

    /// The per-column vocabularies learned at fit time.
    pub fn vocabularies(&self) -> Result<ChoiceManifest> {
        let encoder = self.encoder()?;
        let mut manifest = ChoiceManifest::new();
        for col in &self.categorical_columns {
            manifest.insert(col.clone(), encoder.vocabulary(col)?.to_vec());
        }
        Ok(manifest)
    }

    fn encode_record_into(&self, record: &FeatureRecord, out: &mut Vec<f64>) -> Result<()> {
        let numeric_imputer = self
            .numeric_imputer
            .as_ref()
            .ok_or(PricerError::ModelNotFitted)?;
        let categorical_imputer = self
            .categorical_imputer
            .as_ref()
            .ok_or(PricerError::ModelNotFitted)?;
        let encoder = self.encoder()?;

        for col in &self.numeric_columns {
            let value = match record.get(col) {
                Some(FeatureValue::Numeric(v)) => *v,
                other => return Err(type_mismatch(col, "numeric", other)),
            };
            out.push(numeric_imputer.impute(col, value)?);
        }

        for col in &self.categorical_columns {
            let value = match record.get(col) {
                Some(FeatureValue::Categorical(v)) => v.as_deref(),
                other => return Err(type_mismatch(col, "categorical", other)),
            };
            let filled = categorical_imputer.impute(col, value)?;
            encoder.encode_into(col, filled, out)?;
        }

        Ok(())
    }

    fn encoder(&self) -> Result<&OneHotEncoder> {
        self.encoder.as_ref().ok_or(PricerError::ModelNotFitted)
    }
}

impl Default for ColumnTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted unique values per categorical column, over the whole dataset.
///
/// This is the persisted Choice Manifest; unlike the encoder vocabulary it
/// is built from every row, not just the train partition, so the UI offers
/// every value the data contains.
pub fn choice_manifest(records: &[FeatureRecord]) -> Result<ChoiceManifest> {
    let mut manifest = ChoiceManifest::new();
    for col in CATEGORICAL_COLUMNS {
        let unique: BTreeSet<String> = categorical_column(records, col)?
            .into_iter()
            .flatten()
            .collect();
        manifest.insert(col.to_string(), unique.into_iter().collect());
    }
    Ok(manifest)
}

fn numeric_column(records: &[FeatureRecord], col: &str) -> Result<Vec<Option<f64>>> {
    records
        .iter()
        .map(|r| match r.get(col) {
            Some(FeatureValue::Numeric(v)) => Ok(*v),
            other => Err(type_mismatch(col, "numeric", other)),
        })
        .collect()
}

fn categorical_column(records: &[FeatureRecord], col: &str) -> Result<Vec<Option<String>>> {
    records
        .iter()
        .map(|r| match r.get(col) {
            Some(FeatureValue::Categorical(v)) => Ok(v.clone()),
            other => Err(type_mismatch(col, "categorical", other)),
        })
        .collect()
}

fn type_mismatch(col: &str, expected: &str, got: Option<&FeatureValue>) -> PricerError {
    PricerError::ShapeError {
        expected: format!("{expected} value for column {col}"),
        actual: format!("{got:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FEATURE_COLUMNS;

    fn record(company: &str, inches: Option<f64>) -> FeatureRecord {
        let values = FEATURE_COLUMNS
            .iter()
            .map(|col| match *col {
                "Company" => FeatureValue::categorical(company),
                "Inches" => FeatureValue::Numeric(inches),
                c if crate::schema::is_numeric(c) => FeatureValue::numeric(1.0),
                _ => FeatureValue::categorical("x"),
            })
            .collect();
        FeatureRecord::new(values).unwrap()
    }

    #[test]
    fn test_output_width_counts_vocabularies() {
        let records = vec![record("Apple", Some(13.3)), record("Dell", Some(15.6))];
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&records).unwrap();

        // 4 numeric + Company{Apple,Dell} + 4 single-value categorical columns
        assert_eq!(transformer.n_output_features().unwrap(), 4 + 2 + 4);
    }

    #[test]
    fn test_numeric_block_precedes_indicators() {
        let records = vec![record("Apple", Some(13.3)), record("Dell", Some(15.6))];
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&records).unwrap();

        let vec = transformer.transform_record(&records[0]).unwrap();
        // Numeric block in schema order: Inches, CPU_Frequency, RAM, Weight
        assert_eq!(vec[0], 13.3);
        // First indicator block is Company, vocabulary-sorted: [Apple, Dell]
        assert_eq!(vec[4], 1.0);
        assert_eq!(vec[5], 0.0);
    }

    #[test]
    fn test_missing_numeric_gets_train_median() {
        let records = vec![
            record("Apple", Some(10.0)),
            record("Apple", Some(20.0)),
            record("Apple", Some(30.0)),
        ];
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&records).unwrap();

        let vec = transformer
            .transform_record(&record("Apple", None))
            .unwrap();
        assert_eq!(vec[0], 20.0);
    }

    #[test]
    fn test_unknown_category_is_zero_block() {
        let records = vec![record("Apple", Some(13.3)), record("Dell", Some(15.6))];
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&records).unwrap();

        let vec = transformer
            .transform_record(&record("Razer", Some(17.0)))
            .unwrap();
        assert_eq!(vec[4], 0.0);
        assert_eq!(vec[5], 0.0);
    }

    #[test]
    fn test_transform_before_fit_errors() {
        let transformer = ColumnTransformer::new();
        let err = transformer
            .transform_record(&record("Apple", Some(13.3)))
            .unwrap_err();
        assert!(matches!(err, PricerError::ModelNotFitted));
    }

    #[test]
    fn test_batch_matrix_shape() {
        let records = vec![record("Apple", Some(13.3)), record("Dell", Some(15.6))];
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&records).unwrap();

        let matrix = transformer.transform(&records).unwrap();
        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.ncols(), transformer.n_output_features().unwrap());
    }
}
