//! Artifact store: persistence for the fitted pipeline and choice manifest
//!
//! One directory holds both artifacts under fixed names: the binary model
//! and the human-inspectable JSON choice manifest. Each training run
//! overwrites the previous pair; there is no versioning. Writes go through
//! a temp file plus rename so a concurrent loader never observes a
//! partially written artifact.
//!
//! An absent artifact is a normal state ("not yet trained"), reported as an
//! empty value, never as an error.

use crate::error::{PricerError, Result};
use crate::preprocessing::ChoiceManifest;
use crate::training::FittedPipeline;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the binary model artifact
pub const MODEL_FILE: &str = "model.bin";

/// File name of the choice manifest artifact
pub const CHOICES_FILE: &str = "choices.json";

/// Fixed-location store for the trained artifacts
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the model artifact
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    /// Path of the choice manifest artifact
    pub fn choices_path(&self) -> PathBuf {
        self.dir.join(CHOICES_FILE)
    }

    /// Persist the fitted pipeline and its choice manifest together,
    /// creating the directory as needed and overwriting any prior pair.
    pub fn save(&self, pipeline: &FittedPipeline, choices: &ChoiceManifest) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let model_bytes = bincode::serialize(pipeline)
            .map_err(|e| PricerError::SerializationError(e.to_string()))?;
        write_atomic(&self.model_path(), &model_bytes)?;

        let choices_bytes = serde_json::to_vec_pretty(choices)?;
        write_atomic(&self.choices_path(), &choices_bytes)?;

        info!(
            model = %self.model_path().display(),
            choices = %self.choices_path().display(),
            "artifacts saved"
        );
        Ok(())
    }

    /// Load the fitted pipeline. `Ok(None)` when no model has been trained
    /// yet; an error only for a corrupt or unreadable artifact.
    pub fn load_pipeline(&self) -> Result<Option<FittedPipeline>> {
        let path = self.model_path();
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let pipeline = bincode::deserialize(&bytes).map_err(|e| {
            PricerError::SerializationError(format!(
                "corrupt model artifact {}: {e}",
                path.display()
            ))
        })?;
        Ok(Some(pipeline))
    }

    /// Load the choice manifest; empty when the artifact does not exist.
    ///
    /// Loaded independently of the model: either artifact may be present
    /// without the other.
    pub fn load_choices(&self) -> Result<ChoiceManifest> {
        let path = self.choices_path();
        if !path.exists() {
            return Ok(ChoiceManifest::new());
        }

        let bytes = fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifacts_are_empty_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("never-trained"));

        assert!(store.load_pipeline().unwrap().is_none());
        assert!(store.load_choices().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(store.model_path(), b"not a model").unwrap();

        assert!(matches!(
            store.load_pipeline(),
            Err(PricerError::SerializationError(_))
        ));
    }

    #[test]
    fn test_choices_survive_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let mut choices = ChoiceManifest::new();
        choices.insert(
            "Company".to_string(),
            vec!["Apple".to_string(), "Dell".to_string()],
        );
        let bytes = serde_json::to_vec_pretty(&choices).unwrap();
        fs::write(store.choices_path(), bytes).unwrap();

        assert_eq!(store.load_choices().unwrap(), choices);
    }
}
