//! Regression evaluation metrics

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metrics computed against the held-out test partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Mean squared error
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// R-squared
    pub r2: f64,
    /// Training time in seconds
    pub training_time_secs: f64,
    /// Rows in the train partition
    pub n_train: usize,
    /// Rows in the test partition
    pub n_test: usize,
}

impl RegressionMetrics {
    /// Compute metrics for predictions against true targets.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        let y_mean = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();
        let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

        Self {
            mae,
            mse,
            rmse: mse.sqrt(),
            r2,
            training_time_secs: 0.0,
            n_train: 0,
            n_test: y_true.len(),
        }
    }
}
