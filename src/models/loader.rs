//! Artifact loader for the feature scaler and classifier

use crate::config::{ClassifierBackend, ModelsConfig};
use crate::models::classifier::{Classifier, LogisticRegression};
use crate::models::scaler::FeatureScaler;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Loads the serialized artifacts named in [`ModelsConfig`].
pub struct ArtifactLoader {
    backend: ClassifierBackend,
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    pub fn new(models: &ModelsConfig) -> Self {
        Self {
            backend: models.backend.clone(),
            onnx_threads: models.onnx_threads,
        }
    }

    /// Load and validate the feature scaler.
    pub fn load_scaler<P: AsRef<Path>>(&self, path: P) -> Result<FeatureScaler> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading feature scaler");

        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler from {}", path.display()))?;
        let scaler = FeatureScaler::from_json(&json)
            .with_context(|| format!("Invalid scaler artifact {}", path.display()))?;

        info!(kind = scaler.kind(), "Feature scaler loaded");
        Ok(scaler)
    }

    /// Load the classifier using the configured backend.
    pub fn load_classifier<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn Classifier>> {
        let path = path.as_ref();
        info!(path = %path.display(), backend = ?self.backend, "Loading classifier");

        let classifier: Box<dyn Classifier> = match self.backend {
            ClassifierBackend::LogisticRegression => {
                let json = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read classifier from {}", path.display())
                })?;
                let model = LogisticRegression::from_json(&json)
                    .with_context(|| format!("Invalid classifier artifact {}", path.display()))?;
                Box::new(model)
            }
            ClassifierBackend::Onnx => self.load_onnx(path)?,
        };

        info!(backend = classifier.name(), "Classifier loaded successfully");
        Ok(classifier)
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(&self, path: &Path) -> Result<Box<dyn Classifier>> {
        let model = crate::models::onnx::OnnxClassifier::load(path, self.onnx_threads)?;
        Ok(Box::new(model))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(&self, path: &Path) -> Result<Box<dyn Classifier>> {
        anyhow::bail!(
            "cannot load {}: built without the `onnx` feature (onnx_threads = {})",
            path.display(),
            self.onnx_threads
        )
    }
}
