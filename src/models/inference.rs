//! Inference engine: scale, classify, decide

use crate::config::AppConfig;
use crate::error::{DetectorError, Result};
use crate::features::{self, FeatureVector};
use crate::models::classifier::Classifier;
use crate::models::loader::ArtifactLoader;
use crate::models::scaler::FeatureScaler;
use crate::types::koi::KoiFeatures;
use crate::types::prediction::Prediction;
use tracing::{debug, info};

/// Holds the loaded scaler and classifier for the lifetime of the process.
pub struct InferenceEngine {
    scaler: FeatureScaler,
    classifier: Box<dyn Classifier>,
    /// Class-1 probability above which a KOI is labelled an exoplanet
    threshold: f64,
}

impl InferenceEngine {
    /// Load both artifacts named in the configuration.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let loader = ArtifactLoader::new(&config.models);
        let scaler = loader.load_scaler(&config.models.scaler_path)?;
        let classifier = loader.load_classifier(&config.models.classifier_path)?;

        info!(
            scaler = scaler.kind(),
            classifier = classifier.name(),
            threshold = config.detection.threshold,
            "Inference engine initialized"
        );

        Ok(Self::from_parts(
            scaler,
            classifier,
            config.detection.threshold,
        ))
    }

    /// Assemble an engine from already loaded artifacts.
    pub fn from_parts(
        scaler: FeatureScaler,
        classifier: Box<dyn Classifier>,
        threshold: f64,
    ) -> Self {
        Self {
            scaler,
            classifier,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Classify a single KOI.
    pub fn predict(&self, koi: &KoiFeatures) -> Result<Prediction> {
        let mut predictions = self.predict_vectors(&[features::extract(koi)])?;
        predictions
            .pop()
            .ok_or_else(|| DetectorError::Inference("classifier returned no rows".to_string()))
    }

    /// Classify a batch of KOIs, preserving input order.
    pub fn predict_batch(&self, kois: &[KoiFeatures]) -> Result<Vec<Prediction>> {
        let rows: Vec<FeatureVector> = kois.iter().map(features::extract).collect();
        self.predict_vectors(&rows)
    }

    fn predict_vectors(&self, rows: &[FeatureVector]) -> Result<Vec<Prediction>> {
        let scaled = self.scaler.transform_batch(rows);
        let probabilities = self.classifier.predict_proba(&scaled)?;

        if probabilities.len() != rows.len() {
            return Err(DetectorError::Inference(format!(
                "classifier returned {} results for {} rows",
                probabilities.len(),
                rows.len()
            )));
        }

        let predictions: Vec<Prediction> = probabilities
            .into_iter()
            .map(|p| Prediction::new(p, self.threshold))
            .collect();

        debug!(
            rows = rows.len(),
            exoplanets = predictions.iter().filter(|p| p.label.is_exoplanet()).count(),
            "Inference complete"
        );

        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classifier::LogisticRegression;
    use crate::types::prediction::Classification;

    fn engine() -> InferenceEngine {
        let scaler = FeatureScaler::Standard {
            feature_names: None,
            mean: vec![10.0, 5.0, 500.0, 2.0, 1.0, 800.0],
            scale: vec![10.0, 5.0, 500.0, 2.0, 1.0, 800.0],
        };
        // Deep transits around small stars score high.
        let model = LogisticRegression::new([0.0, 0.0, 2.0, 0.0, -1.0, 0.0], 0.0);
        InferenceEngine::from_parts(scaler, Box::new(model), 0.5)
    }

    #[test]
    fn test_predict_single() {
        let engine = engine();

        let deep = KoiFeatures::new(10.0, 5.0, 1500.0, 2.0, 1.0, 800.0);
        let prediction = engine.predict(&deep).unwrap();
        assert_eq!(prediction.label, Classification::Exoplanet);
        assert!(prediction.exoplanet_probability() > 0.98);

        let average = KoiFeatures::new(10.0, 5.0, 500.0, 2.0, 1.0, 800.0);
        let prediction = engine.predict(&average).unwrap();
        assert_eq!(prediction.label, Classification::NotExoplanet);
        assert_eq!(prediction.confidence, 0.5);
    }

    #[test]
    fn test_batch_matches_single() {
        let engine = engine();
        let kois = vec![
            KoiFeatures::new(3.5, 2.0, 120.0, 1.2, 0.9, 1100.0),
            KoiFeatures::new(365.25, 6.5, 500.0, 1.0, 1.0, 288.0),
            KoiFeatures::new(0.8, 1.1, 25000.0, 14.0, 0.7, 1900.0),
        ];

        let batch = engine.predict_batch(&kois).unwrap();
        assert_eq!(batch.len(), kois.len());
        for (koi, from_batch) in kois.iter().zip(&batch) {
            assert_eq!(&engine.predict(koi).unwrap(), from_batch);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(engine().predict_batch(&[]).unwrap().is_empty());
    }
}
