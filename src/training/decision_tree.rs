//! Regression decision tree

use crate::error::{PricerError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf with the mean target of its samples
    Leaf { value: f64, n_samples: usize },
    /// Internal split on `feature_idx <= threshold`
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

/// CART regression tree with variance-reduction splits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Fit the tree to training data
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
                "cannot fit a tree on zero samples".to_string(),
            ));
        }

        self.n_features = n_features;

        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, y, &indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let y_subset: Vec<f64> = indices.iter().map(|&i| y[i]).collect();

        let should_stop = n_samples < self.min_samples_split
            || n_samples <= self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || is_constant(&y_subset);

        if should_stop {
            return TreeNode::Leaf {
                value: mean(&y_subset),
                n_samples,
            };
        }

        if let Some((best_feature, best_threshold, best_gain)) = self.find_best_split(x, y, indices)
        {
            let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| x[[i, best_feature]] <= best_threshold);

            if left_indices.len() < self.min_samples_leaf
                || right_indices.len() < self.min_samples_leaf
            {
                return TreeNode::Leaf {
                    value: mean(&y_subset),
                    n_samples,
                };
            }

            importances[best_feature] += n_samples as f64 * best_gain;

            let left = Box::new(self.build_tree(x, y, &left_indices, depth + 1, importances));
            let right = Box::new(self.build_tree(x, y, &right_indices, depth + 1, importances));

            TreeNode::Split {
                feature_idx: best_feature,
                threshold: best_threshold,
                left,
                right,
                n_samples,
            }
        } else {
            TreeNode::Leaf {
                value: mean(&y_subset),
                n_samples,
            }
        }
    }

    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
    ) -> Option<(usize, f64, f64)> {
        let n_features = x.ncols();
        let n_features_to_try = self.max_features.unwrap_or(n_features).min(n_features);

        let y_subset: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let parent_impurity = variance(&y_subset);

        let mut best: Option<(usize, f64, f64)> = None;

        for feature_idx in 0..n_features_to_try {
            let mut values: Vec<f64> = indices.iter().map(|&i| x[[i, feature_idx]]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();

            for window in values.windows(2) {
                let threshold = (window[0] + window[1]) / 2.0;

                // Accumulate split statistics in one pass; variance from
                // sum and sum-of-squares avoids re-iterating per side.
                let mut left_count = 0usize;
                let mut right_count = 0usize;
                let mut left_sum = 0.0f64;
                let mut right_sum = 0.0f64;
                let mut left_sq_sum = 0.0f64;
                let mut right_sq_sum = 0.0f64;

                for &idx in indices {
                    let yi = y[idx];
                    if x[[idx, feature_idx]] <= threshold {
                        left_count += 1;
                        left_sum += yi;
                        left_sq_sum += yi * yi;
                    } else {
                        right_count += 1;
                        right_sum += yi;
                        right_sq_sum += yi * yi;
                    }
                }

                if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                    continue;
                }

                let left_impurity = variance_from_sums(left_count, left_sum, left_sq_sum);
                let right_impurity = variance_from_sums(right_count, right_sum, right_sq_sum);

                let n = indices.len() as f64;
                let weighted =
                    (left_count as f64 * left_impurity + right_count as f64 * right_impurity) / n;

                let gain = parent_impurity - weighted;
                if gain > best.map_or(0.0, |(_, _, g)| g) {
                    best = Some((feature_idx, threshold, gain));
                }
            }
        }

        best
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(PricerError::ModelNotFitted)?;

        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| predict_sample(root, &x.row(i).to_vec()))
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get tree depth
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, node_depth)
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

fn predict_sample(node: &TreeNode, sample: &[f64]) -> f64 {
    match node {
        TreeNode::Leaf { value, .. } => *value,
        TreeNode::Split {
            feature_idx,
            threshold,
            left,
            right,
            ..
        } => {
            if sample[*feature_idx] <= *threshold {
                predict_sample(left, sample)
            } else {
                predict_sample(right, sample)
            }
        }
    }
}

fn node_depth(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
    }
}

fn mean(y: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter().sum::<f64>() / y.len() as f64
}

fn variance(y: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let m = mean(y);
    y.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / y.len() as f64
}

fn variance_from_sums(count: usize, sum: f64, sq_sum: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    sq_sum / n - (sum / n).powi(2)
}

fn is_constant(y: &[f64]) -> bool {
    match y.first() {
        None => true,
        Some(first) => y.iter().all(|&v| (v - first).abs() < 1e-10),
    }
}
