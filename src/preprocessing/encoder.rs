//! One-hot encoding with an ignore-unknown policy
//!
//! The vocabulary for each column is the sorted, deduplicated set of values
//! observed at fit time. A value outside the vocabulary encodes as an
//! all-zero indicator block rather than an error; prediction requests must
//! survive categories training never saw.

use crate::error::{PricerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Per-column sorted list of observed categorical values.
///
/// Persisted alongside the model as UI/validation guidance; it never
/// constrains prediction input.
pub type ChoiceManifest = BTreeMap<String, Vec<String>>;

/// One-hot encoder over string categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    // column -> sorted unique categories; index in the vec is the indicator
    // position within that column's block
    vocabularies: HashMap<String, Vec<String>>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self {
            vocabularies: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Learn the sorted vocabulary of each column from non-missing values.
    pub fn fit<'a, I>(&mut self, columns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [Option<String>])>,
    {
        for (name, values) in columns {
            let unique: BTreeSet<&str> = values.iter().flatten().map(|s| s.as_str()).collect();
            self.vocabularies.insert(
                name.to_string(),
                unique.into_iter().map(|s| s.to_string()).collect(),
            );
        }
        self.is_fitted = true;
        Ok(self)
    }

    /// Width of a column's indicator block.
    pub fn width(&self, column: &str) -> Result<usize> {
        Ok(self.vocabulary(column)?.len())
    }

    /// The learned vocabulary for a column.
    pub fn vocabulary(&self, column: &str) -> Result<&[String]> {
        if !self.is_fitted {
            return Err(PricerError::ModelNotFitted);
        }
        self.vocabularies
            .get(column)
            .map(|v| v.as_slice())
            .ok_or_else(|| PricerError::FeatureNotFound(column.to_string()))
    }

    /// Append the indicator block for `value` to `out`.
    ///
    /// Unknown values append all zeros.
    pub fn encode_into(&self, column: &str, value: &str, out: &mut Vec<f64>) -> Result<()> {
        let vocab = self.vocabulary(column)?;
        let hit = vocab.binary_search_by(|v| v.as_str().cmp(value)).ok();
        for idx in 0..vocab.len() {
            out.push(if Some(idx) == hit { 1.0 } else { 0.0 });
        }
        Ok(())
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> OneHotEncoder {
        let values = vec![
            Some("Dell".to_string()),
            Some("Apple".to_string()),
            Some("Dell".to_string()),
            None,
        ];
        let mut encoder = OneHotEncoder::new();
        encoder.fit([("Company", &values[..])]).unwrap();
        encoder
    }

    #[test]
    fn test_vocabulary_is_sorted_and_deduplicated() {
        let encoder = fitted();
        assert_eq!(encoder.vocabulary("Company").unwrap(), ["Apple", "Dell"]);
    }

    #[test]
    fn test_known_value_sets_one_indicator() {
        let encoder = fitted();
        let mut out = Vec::new();
        encoder.encode_into("Company", "Dell", &mut out).unwrap();
        assert_eq!(out, vec![0.0, 1.0]);
    }

    #[test]
    fn test_unknown_value_is_all_zeros() {
        let encoder = fitted();
        let mut out = Vec::new();
        encoder.encode_into("Company", "Razer", &mut out).unwrap();
        assert_eq!(out, vec![0.0, 0.0]);
    }

    #[test]
    fn test_unfitted_encoder_errors() {
        let encoder = OneHotEncoder::new();
        let mut out = Vec::new();
        assert!(matches!(
            encoder.encode_into("Company", "Dell", &mut out),
            Err(PricerError::ModelNotFitted)
        ));
    }
}
