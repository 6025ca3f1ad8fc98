//! Missing value imputation
//!
//! Imputation statistics are learned once at fit time and reused for every
//! transform, including single-record prediction; the fill values live in
//! the persisted artifact.

use crate::error::{PricerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Median imputer for numeric columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericImputer {
    medians: HashMap<String, f64>,
    is_fitted: bool,
}

impl NumericImputer {
    pub fn new() -> Self {
        Self {
            medians: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Learn the per-column median over non-missing values.
    pub fn fit<'a, I>(&mut self, columns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [Option<f64>])>,
    {
        for (name, values) in columns {
            self.medians.insert(name.to_string(), median(values));
        }
        self.is_fitted = true;
        Ok(self)
    }

    /// The learned fill value for a column.
    pub fn fill_value(&self, column: &str) -> Result<f64> {
        if !self.is_fitted {
            return Err(PricerError::ModelNotFitted);
        }
        self.medians
            .get(column)
            .copied()
            .ok_or_else(|| PricerError::FeatureNotFound(column.to_string()))
    }

    /// Substitute the learned median for a missing value.
    pub fn impute(&self, column: &str, value: Option<f64>) -> Result<f64> {
        match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => self.fill_value(column),
        }
    }
}

impl Default for NumericImputer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mode (most frequent value) imputer for categorical columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalImputer {
    modes: HashMap<String, String>,
    is_fitted: bool,
}

impl CategoricalImputer {
    pub fn new() -> Self {
        Self {
            modes: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Learn the per-column mode over non-missing values.
    pub fn fit<'a, I>(&mut self, columns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [Option<String>])>,
    {
        for (name, values) in columns {
            self.modes.insert(name.to_string(), mode(values));
        }
        self.is_fitted = true;
        Ok(self)
    }

    /// The learned fill value for a column.
    pub fn fill_value(&self, column: &str) -> Result<&str> {
        if !self.is_fitted {
            return Err(PricerError::ModelNotFitted);
        }
        self.modes
            .get(column)
            .map(|s| s.as_str())
            .ok_or_else(|| PricerError::FeatureNotFound(column.to_string()))
    }

    /// Substitute the learned mode for a missing value.
    pub fn impute<'a>(&'a self, column: &str, value: Option<&'a str>) -> Result<&'a str> {
        match value {
            Some(v) => Ok(v),
            None => self.fill_value(column),
        }
    }
}

impl Default for CategoricalImputer {
    fn default() -> Self {
        Self::new()
    }
}

fn median(values: &[Option<f64>]) -> f64 {
    let mut present: Vec<f64> = values
        .iter()
        .filter_map(|v| *v)
        .filter(|v| v.is_finite())
        .collect();
    if present.is_empty() {
        return 0.0;
    }
    present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        (present[mid - 1] + present[mid]) / 2.0
    } else {
        present[mid]
    }
}

fn mode(values: &[Option<String>]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }

    // Ties break toward the lexicographically smaller value so fit is
    // deterministic across runs.
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, _)| value.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[Some(3.0), Some(1.0), Some(2.0)]), 2.0);
        assert_eq!(median(&[Some(4.0), Some(1.0), Some(2.0), Some(3.0)]), 2.5);
    }

    #[test]
    fn test_median_skips_missing_and_nan() {
        assert_eq!(median(&[None, Some(f64::NAN), Some(5.0), Some(7.0)]), 6.0);
        assert_eq!(median(&[None, None]), 0.0);
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        let values = vec![
            Some("a".to_string()),
            Some("b".to_string()),
            Some("b".to_string()),
            None,
        ];
        assert_eq!(mode(&values), "b");
    }

    #[test]
    fn test_mode_tie_is_deterministic() {
        let values = vec![Some("b".to_string()), Some("a".to_string())];
        assert_eq!(mode(&values), "a");
    }

    #[test]
    fn test_numeric_impute() {
        let col = [Some(1.0), Some(3.0), None];
        let mut imputer = NumericImputer::new();
        imputer.fit([("Inches", &col[..])]).unwrap();

        assert_eq!(imputer.impute("Inches", Some(15.6)).unwrap(), 15.6);
        assert_eq!(imputer.impute("Inches", None).unwrap(), 2.0);
        assert_eq!(imputer.impute("Inches", Some(f64::NAN)).unwrap(), 2.0);
    }

    #[test]
    fn test_unfitted_imputer_errors() {
        let imputer = NumericImputer::new();
        assert!(matches!(
            imputer.impute("Inches", None),
            Err(PricerError::ModelNotFitted)
        ));
    }
}
