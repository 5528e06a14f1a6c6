//! Classification results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Class 1
    #[serde(rename = "Exoplanet")]
    Exoplanet,
    /// Class 0
    #[serde(rename = "Not Exoplanet")]
    NotExoplanet,
}

impl Classification {
    /// Decide the class from the class-1 probability.
    ///
    /// Class 1 only when the probability strictly exceeds the threshold.
    pub fn from_probability(exoplanet_probability: f64, threshold: f64) -> Self {
        if exoplanet_probability > threshold {
            Classification::Exoplanet
        } else {
            Classification::NotExoplanet
        }
    }

    /// Numeric class index (0 or 1)
    pub fn class_index(self) -> u8 {
        match self {
            Classification::Exoplanet => 1,
            Classification::NotExoplanet => 0,
        }
    }

    pub fn is_exoplanet(self) -> bool {
        self == Classification::Exoplanet
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Exoplanet => "Exoplanet",
            Classification::NotExoplanet => "Not Exoplanet",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class probabilities. The two values always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub not_exoplanet: f64,
    pub exoplanet: f64,
}

impl ClassProbabilities {
    /// Build from the class-1 probability alone.
    pub fn from_exoplanet(exoplanet: f64) -> Self {
        let exoplanet = exoplanet.clamp(0.0, 1.0);
        Self {
            not_exoplanet: 1.0 - exoplanet,
            exoplanet,
        }
    }

    /// Build from raw per-class scores, renormalising so they sum to 1.
    ///
    /// Falls back to an even split when both scores are zero or not finite.
    pub fn normalized(not_exoplanet: f64, exoplanet: f64) -> Self {
        let not_exoplanet = not_exoplanet.max(0.0);
        let exoplanet = exoplanet.max(0.0);
        let total = not_exoplanet + exoplanet;
        if !total.is_finite() || total <= 0.0 {
            return Self::from_exoplanet(0.5);
        }
        Self::from_exoplanet(exoplanet / total)
    }

    /// Probability of the more likely class
    pub fn max(&self) -> f64 {
        self.exoplanet.max(self.not_exoplanet)
    }
}

/// Outcome of classifying one KOI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Classification,
    pub probabilities: ClassProbabilities,
    /// Maximum of the two class probabilities
    pub confidence: f64,
}

impl Prediction {
    pub fn new(probabilities: ClassProbabilities, threshold: f64) -> Self {
        Self {
            label: Classification::from_probability(probabilities.exoplanet, threshold),
            probabilities,
            confidence: probabilities.max(),
        }
    }

    pub fn exoplanet_probability(&self) -> f64 {
        self.probabilities.exoplanet
    }

    /// Probability of the predicted label. Equals `confidence` only at a 0.5 threshold.
    pub fn label_probability(&self) -> f64 {
        match self.label {
            Classification::Exoplanet => self.probabilities.exoplanet,
            Classification::NotExoplanet => self.probabilities.not_exoplanet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_from_probability() {
        assert_eq!(
            Classification::from_probability(0.51, 0.5),
            Classification::Exoplanet
        );
        assert_eq!(
            Classification::from_probability(0.5, 0.5),
            Classification::NotExoplanet
        );
        assert_eq!(
            Classification::from_probability(0.1, 0.5),
            Classification::NotExoplanet
        );
        assert_eq!(
            Classification::from_probability(0.65, 0.7),
            Classification::NotExoplanet
        );
    }

    #[test]
    fn test_normalized_probabilities_sum_to_one() {
        let probs = ClassProbabilities::normalized(0.3, 0.9);
        assert!((probs.exoplanet + probs.not_exoplanet - 1.0).abs() < 1e-12);
        assert!((probs.exoplanet - 0.75).abs() < 1e-12);

        let even = ClassProbabilities::normalized(0.0, 0.0);
        assert_eq!(even.exoplanet, 0.5);
    }

    #[test]
    fn test_prediction_confidence_is_max() {
        let prediction = Prediction::new(ClassProbabilities::from_exoplanet(0.2), 0.5);
        assert_eq!(prediction.label, Classification::NotExoplanet);
        assert!((prediction.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_label_probability_follows_threshold() {
        let prediction = Prediction::new(ClassProbabilities::from_exoplanet(0.65), 0.7);
        assert_eq!(prediction.label, Classification::NotExoplanet);
        assert!((prediction.label_probability() - 0.35).abs() < 1e-12);
        assert!((prediction.confidence - 0.65).abs() < 1e-12);

        let prediction = Prediction::new(ClassProbabilities::from_exoplanet(0.65), 0.5);
        assert!((prediction.label_probability() - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_serialization() {
        let prediction = Prediction::new(ClassProbabilities::from_exoplanet(0.9), 0.5);

        let json = serde_json::to_string(&prediction).unwrap();
        assert!(json.contains("\"label\":\"Exoplanet\""));

        let deserialized: Prediction = serde_json::from_str(&json).unwrap();
        assert_eq!(prediction.label, deserialized.label);
        assert_eq!(prediction.confidence, deserialized.confidence);
    }
}
