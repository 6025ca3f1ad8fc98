//! Training configuration

use serde::{Deserialize, Serialize};

/// Configuration for fitting the price pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of trees in the forest
    pub n_estimators: usize,

    /// Maximum depth per tree (None = grow until pure)
    pub max_depth: Option<usize>,

    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,

    /// Held-out fraction for evaluation
    pub test_split: f64,

    /// Random seed for the split and the forest
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_depth: None,
            min_samples_leaf: 1,
            test_split: 0.2,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Builder method to set the number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Builder method to set max depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_split(mut self, fraction: f64) -> Self {
        self.test_split = fraction;
        self
    }

    /// Builder method to set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
