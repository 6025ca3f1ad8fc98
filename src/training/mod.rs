//! Model training
//!
//! The training pipeline wraps the column transformer and a random forest
//! regressor into one fit/predict unit. It owns the seeded train/test
//! split and the held-out evaluation; the result is an immutable
//! [`FittedPipeline`] safe to share across concurrent predictors.

pub mod config;
pub mod decision_tree;
mod engine;
mod metrics;
pub mod random_forest;

pub use config::TrainingConfig;
pub use decision_tree::{DecisionTree, TreeNode};
pub use engine::{fit, FittedPipeline};
pub use metrics::RegressionMetrics;
pub use random_forest::{MaxFeatures, RandomForestRegressor};
