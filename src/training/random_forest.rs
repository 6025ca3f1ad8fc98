//! Random forest regressor

use crate::error::{PricerError, Result};
use super::decision_tree::DecisionTree;
use ndarray::{Array1, Array2};
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Strategy for the number of features considered per split
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// All features (the usual choice for regression forests)
    All,
    /// Square root of the feature count
    Sqrt,
    /// Fixed number
    Fixed(usize),
}

/// Bagged ensemble of regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split
    pub max_features: MaxFeatures,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Base random seed; tree i uses `seed + i`
    pub seed: u64,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            bootstrap: true,
            seed: 42,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set max features strategy
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the base random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn compute_max_features(&self, n_features: usize) -> usize {
        match self.max_features {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Fixed(n) => n.min(n_features),
        }
        .max(1)
    }

    /// Fit the forest to training data. Trees build in parallel; each tree
    /// derives its RNG from the base seed so results are reproducible.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(PricerError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PricerError::TrainingError(
                "cannot fit a forest on zero samples".to_string(),
            ));
        }

        self.n_features = n_features;
        let max_features = self.compute_max_features(n_features);

        let trees: Result<Vec<DecisionTree>> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = self.seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                let sample_indices: Vec<usize> = if self.bootstrap {
                    (0..n_samples)
                        .map(|_| (rng.next_u64() as usize) % n_samples)
                        .collect()
                } else {
                    (0..n_samples).collect()
                };

                let x_boot = x.select(ndarray::Axis(0), &sample_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = DecisionTree::new()
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }
                tree.max_features = Some(max_features);

                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        self.compute_feature_importances();
        Ok(self)
    }

    fn compute_feature_importances(&mut self) {
        if self.trees.is_empty() {
            return;
        }

        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (slot, &val) in total.iter_mut().zip(imp.iter()) {
                    *slot += val;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        for imp in &mut total {
            *imp /= n_trees;
        }
        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            for imp in &mut total {
                *imp /= sum;
            }
        }

        self.feature_importances = Some(Array1::from_vec(total));
    }

    /// Mean prediction across trees
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(PricerError::ModelNotFitted);
        }

        let per_tree: Result<Vec<Array1<f64>>> =
            self.trees.par_iter().map(|tree| tree.predict(x)).collect();
        let per_tree = per_tree?;

        let n_samples = x.nrows();
        let predictions: Vec<f64> = (0..n_samples)
            .map(|i| per_tree.iter().map(|p| p[i]).sum::<f64>() / per_tree.len() as f64)
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Predict a single feature vector
    pub fn predict_one(&self, features: &Array1<f64>) -> Result<f64> {
        let row = Array2::from_shape_vec((1, features.len()), features.to_vec()).map_err(|e| {
            PricerError::ShapeError {
                expected: format!("(1, {})", features.len()),
                actual: e.to_string(),
            }
        })?;
        Ok(self.predict(&row)?[0])
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
