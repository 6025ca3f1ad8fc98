//! Feature preprocessing
//!
//! Per-type column transforms composed into a single column-wise
//! transformer: numeric columns pass through median imputation only (the
//! estimator is scale-invariant, so no scaling step), categorical columns
//! pass through mode imputation followed by one-hot encoding that ignores
//! unknown categories at prediction time.

mod encoder;
mod imputer;
mod transformer;

pub use encoder::{ChoiceManifest, OneHotEncoder};
pub use imputer::{CategoricalImputer, NumericImputer};
pub use transformer::{choice_manifest, ColumnTransformer};
