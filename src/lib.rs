//! Laptop price prediction pipeline
//!
//! Two halves: an offline training step that fits a tabular regression
//! pipeline from a CSV dataset and persists it, and a serving side that
//! loads the persisted pipeline once and answers prediction requests.
//!
//! # Modules
//!
//! - [`schema`] - The fixed feature schema and typed input records
//! - [`dataset`] - CSV loading, validation, numeric coercion
//! - [`preprocessing`] - Imputation and one-hot encoding, composed column-wise
//! - [`training`] - Random forest regressor, train/test split, evaluation
//! - [`artifact`] - Persistence for the fitted pipeline and choice manifest
//! - [`runtime`] - Lazily-initialized serving state (pipeline, choices, catalog)
//! - [`catalog`] - Per-manufacturer dataset summary
//! - [`input`] - The user-input parsing boundary
//! - [`cli`] - Command-line interface

pub mod error;

pub mod artifact;
pub mod catalog;
pub mod cli;
pub mod dataset;
pub mod input;
pub mod preprocessing;
pub mod runtime;
pub mod schema;
pub mod training;

pub use error::{PricerError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::artifact::ArtifactStore;
    pub use crate::catalog::{Catalog, CompanySummary};
    pub use crate::dataset::TrainingSet;
    pub use crate::error::{PricerError, Result};
    pub use crate::input::{LaptopInput, RawInput};
    pub use crate::preprocessing::{ChoiceManifest, ColumnTransformer};
    pub use crate::runtime::{PredictorRuntime, RuntimeConfig};
    pub use crate::schema::{FeatureRecord, FeatureValue};
    pub use crate::training::{FittedPipeline, RegressionMetrics, TrainingConfig};
}
