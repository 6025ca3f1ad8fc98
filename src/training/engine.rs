//! Fit/predict engine
//!
//! Owns the seeded train/test split and held-out evaluation. The
//! transformer is fitted on the train partition only, so evaluation never
//! leaks test statistics into the imputers or vocabularies.

use crate::dataset::TrainingSet;
use crate::error::{PricerError, Result};
use crate::preprocessing::ColumnTransformer;
use crate::schema::FeatureRecord;
use crate::training::{RandomForestRegressor, RegressionMetrics, TrainingConfig};
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// The combined, immutable preprocessing + model state produced by training.
///
/// Owned by whichever process fit or loaded it; predictions never mutate
/// it, so it is safe to call [`FittedPipeline::predict`] from many
/// concurrent callers without locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPipeline {
    transformer: ColumnTransformer,
    forest: RandomForestRegressor,
    metrics: RegressionMetrics,
}

impl FittedPipeline {
    /// Predict the price for a single schema-complete record.
    ///
    /// Missing numerics and unseen categoricals are handled by the fitted
    /// transform; the only failure mode is a record that does not match
    /// the schema shape.
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        let features = self.transformer.transform_record(record)?;
        self.forest.predict_one(&features)
    }

    /// Predict a batch of records.
    pub fn predict_batch(&self, records: &[FeatureRecord]) -> Result<Vec<f64>> {
        let x = self.transformer.transform(records)?;
        Ok(self.forest.predict(&x)?.to_vec())
    }

    /// Held-out evaluation metrics from the fit that produced this pipeline.
    pub fn metrics(&self) -> &RegressionMetrics {
        &self.metrics
    }

    /// The fitted forest's feature importances, if available.
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.forest.feature_importances()
    }
}

/// Fit the full pipeline: split, fit transformer + forest on the train
/// partition, evaluate on the held-out partition.
///
/// Deterministic given the seed and input data; expensive, expected to run
/// rarely as an offline step.
pub fn fit(data: &TrainingSet, config: &TrainingConfig) -> Result<FittedPipeline> {
    let n = data.len();
    if n < 5 {
        return Err(PricerError::TrainingError(format!(
            "need at least 5 rows to fit, got {n}"
        )));
    }

    let start = Instant::now();

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * config.test_split).round() as usize).clamp(1, n - 1);
    let (test_idx, train_idx) = indices.split_at(n_test);

    let train_records: Vec<FeatureRecord> =
        train_idx.iter().map(|&i| data.records[i].clone()).collect();
    let y_train = Array1::from_vec(train_idx.iter().map(|&i| data.targets[i]).collect());

    let mut transformer = ColumnTransformer::new();
    transformer.fit(&train_records)?;
    let x_train = transformer.transform(&train_records)?;

    let mut forest = RandomForestRegressor::new(config.n_estimators)
        .with_min_samples_leaf(config.min_samples_leaf)
        .with_seed(config.seed);
    if let Some(depth) = config.max_depth {
        forest = forest.with_max_depth(depth);
    }
    forest.fit(&x_train, &y_train)?;

    let test_records: Vec<FeatureRecord> =
        test_idx.iter().map(|&i| data.records[i].clone()).collect();
    let y_test = Array1::from_vec(test_idx.iter().map(|&i| data.targets[i]).collect());
    let x_test = transformer.transform(&test_records)?;
    let y_pred = forest.predict(&x_test)?;

    let mut metrics = RegressionMetrics::compute(&y_test, &y_pred);
    metrics.training_time_secs = start.elapsed().as_secs_f64();
    metrics.n_train = train_idx.len();
    metrics.n_test = test_idx.len();

    info!(
        n_train = metrics.n_train,
        n_test = metrics.n_test,
        mae = metrics.mae,
        rmse = metrics.rmse,
        secs = metrics.training_time_secs,
        "pipeline fitted"
    );

    Ok(FittedPipeline {
        transformer,
        forest,
        metrics,
    })
}
