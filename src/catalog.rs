//! Manufacturer catalog derived from the raw dataset
//!
//! Built once from the CSV, independent of the trained pipeline, for
//! lookup/autocomplete use. A missing or unreadable dataset degrades to an
//! empty catalog tagged with the reason instead of failing the caller.

use crate::error::{PricerError, Result};
use crate::schema::{GROUP_COLUMN, PRODUCT_COLUMN, TYPE_COLUMN};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::warn;

/// Display samples are truncated to this many entries; the counts stay true.
const SAMPLE_LIMIT: usize = 5;

/// Per-manufacturer aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub name: String,
    /// Unique product count (deduplicated)
    pub product_count: usize,
    /// Unique type count (deduplicated)
    pub type_count: usize,
    /// First `SAMPLE_LIMIT` products, sorted
    pub sample_products: Vec<String>,
    /// First `SAMPLE_LIMIT` types, sorted
    pub sample_types: Vec<String>,
}

/// Read-only summary of the dataset, keyed by manufacturer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub dataset_path: String,
    /// Rows with a present grouping key
    pub row_count: usize,
    pub company_count: usize,
    /// Sorted ascending by company name
    pub companies: Vec<CompanySummary>,
    /// Why the catalog is empty, when it is
    pub error: Option<String>,
}

impl Catalog {
    /// Aggregate a loaded dataset.
    pub fn build(df: &DataFrame, dataset_path: &str) -> Result<Self> {
        let companies_col = string_column(df, GROUP_COLUMN)?;
        let products_col = string_column(df, PRODUCT_COLUMN)?;
        let types_col = string_column(df, TYPE_COLUMN)?;

        let mut groups: BTreeMap<String, (BTreeSet<String>, BTreeSet<String>)> = BTreeMap::new();
        let mut row_count = 0usize;

        for row in 0..df.height() {
            // Rows with a missing grouping key are dropped
            let Some(company) = &companies_col[row] else {
                continue;
            };
            row_count += 1;

            let entry = groups.entry(company.clone()).or_default();
            if let Some(product) = &products_col[row] {
                entry.0.insert(product.clone());
            }
            if let Some(type_name) = &types_col[row] {
                entry.1.insert(type_name.clone());
            }
        }

        let companies: Vec<CompanySummary> = groups
            .into_iter()
            .map(|(name, (products, types))| CompanySummary {
                name,
                product_count: products.len(),
                type_count: types.len(),
                sample_products: products.into_iter().take(SAMPLE_LIMIT).collect(),
                sample_types: types.into_iter().take(SAMPLE_LIMIT).collect(),
            })
            .collect();

        Ok(Self {
            dataset_path: dataset_path.to_string(),
            row_count,
            company_count: companies.len(),
            companies,
            error: None,
        })
    }

    /// Read the dataset and aggregate it; any failure (file absent, column
    /// missing) yields an error-tagged empty catalog rather than an error.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let result = crate::dataset::load(path)
            .and_then(|df| Self::build(&df, &path.display().to_string()));

        match result {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "catalog unavailable");
                Self::empty_with_error(&path.display().to_string(), e.to_string())
            }
        }
    }

    fn empty_with_error(dataset_path: &str, reason: String) -> Self {
        Self {
            dataset_path: dataset_path.to_string(),
            row_count: 0,
            company_count: 0,
            companies: Vec::new(),
            error: Some(reason),
        }
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| PricerError::FeatureNotFound(name.to_string()))?;
    let casted = column.cast(&DataType::String)?;
    let ca = casted
        .as_materialized_series()
        .str()
        .map_err(|e| PricerError::DataError(e.to_string()))?;
    Ok(ca.into_iter().map(|v| v.map(|s| s.to_string())).collect())
}
