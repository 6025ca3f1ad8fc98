//! Runtime cache: lazily-initialized serving state
//!
//! An explicit context object constructed once at service startup and
//! passed by reference to request handlers. Three independent slots —
//! pipeline, choice manifest, catalog — each load on first use and then
//! stay cached for the life of the process; retraining requires a restart.
//!
//! Absence is a defined empty state, not an error: a missing model leaves
//! the pipeline slot `None` ("train first"), a missing manifest yields an
//! empty map, a missing dataset yields an error-tagged catalog. The host
//! process must never crash at startup because artifacts are not there yet.

use crate::artifact::ArtifactStore;
use crate::catalog::Catalog;
use crate::preprocessing::ChoiceManifest;
use crate::training::FittedPipeline;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Paths the runtime resolves its artifacts and dataset from
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub dataset_path: PathBuf,
    pub artifacts_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            dataset_path: std::env::var("PRICER_DATASET")
                .unwrap_or_else(|_| "laptop_price.csv".to_string())
                .into(),
            artifacts_dir: std::env::var("PRICER_ARTIFACTS")
                .unwrap_or_else(|_| "artifacts".to_string())
                .into(),
        }
    }
}

/// Process-wide holder for the loaded pipeline, choices, and catalog.
///
/// Each slot is a `OnceLock`: concurrent first accesses converge to a
/// single observed value, and subsequent gets return the cached result
/// without touching storage again.
pub struct PredictorRuntime {
    config: RuntimeConfig,
    store: ArtifactStore,
    pipeline: OnceLock<Option<Arc<FittedPipeline>>>,
    choices: OnceLock<ChoiceManifest>,
    catalog: OnceLock<Catalog>,
}

impl PredictorRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let store = ArtifactStore::new(&config.artifacts_dir);
        Self {
            config,
            store,
            pipeline: OnceLock::new(),
            choices: OnceLock::new(),
            catalog: OnceLock::new(),
        }
    }

    /// The fitted pipeline, loaded from the artifact store on first call.
    ///
    /// `None` means no model has been trained yet (or the artifact is
    /// unreadable); callers surface a "train first" state.
    pub fn pipeline(&self) -> Option<Arc<FittedPipeline>> {
        self.pipeline
            .get_or_init(|| match self.store.load_pipeline() {
                Ok(Some(pipeline)) => {
                    info!(path = %self.store.model_path().display(), "model loaded");
                    Some(Arc::new(pipeline))
                }
                Ok(None) => {
                    warn!(path = %self.store.model_path().display(), "no model artifact; train first");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "failed to load model artifact");
                    None
                }
            })
            .clone()
    }

    /// The choice manifest; empty when the artifact is absent.
    pub fn choices(&self) -> &ChoiceManifest {
        self.choices
            .get_or_init(|| match self.store.load_choices() {
                Ok(choices) => choices,
                Err(e) => {
                    warn!(error = %e, "failed to load choice manifest");
                    ChoiceManifest::new()
                }
            })
    }

    /// The manufacturer catalog, built from the raw dataset on first call.
    pub fn catalog(&self) -> &Catalog {
        self.catalog
            .get_or_init(|| Catalog::from_path(&self.config.dataset_path))
    }

    /// The artifact store this runtime reads from.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }
}
