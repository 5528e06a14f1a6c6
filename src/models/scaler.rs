//! Pre-fitted feature scaler
//!
//! The scaler artifact is a JSON export of the fitted parameters. Field
//! aliases accept the scikit-learn attribute names (`mean_`, `scale_`, ...)
//! so parameters can be dumped straight from a fitted estimator.

use crate::error::{DetectorError, Result};
use crate::features::{FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};
use serde::Deserialize;

/// Fitted scaling transform applied to raw features before classification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    /// Standardization: `(x - mean) / scale`
    Standard {
        #[serde(default, alias = "feature_names_in_")]
        feature_names: Option<Vec<String>>,
        #[serde(alias = "mean_")]
        mean: Vec<f64>,
        #[serde(alias = "scale_")]
        scale: Vec<f64>,
    },
    /// Min-max scaling: `x * scale + min`
    MinMax {
        #[serde(default, alias = "feature_names_in_")]
        feature_names: Option<Vec<String>>,
        #[serde(alias = "min_")]
        min: Vec<f64>,
        #[serde(alias = "scale_")]
        scale: Vec<f64>,
    },
}

impl FeatureScaler {
    /// Parse and validate a scaler artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        let scaler: FeatureScaler = serde_json::from_str(json)?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check parameter lengths and, when recorded, the fitted feature order.
    pub fn validate(&self) -> Result<()> {
        let (names, offset, scale) = match self {
            FeatureScaler::Standard {
                feature_names,
                mean,
                scale,
            } => (feature_names, mean, scale),
            FeatureScaler::MinMax {
                feature_names,
                min,
                scale,
            } => (feature_names, min, scale),
        };

        if offset.len() != FEATURE_COUNT || scale.len() != FEATURE_COUNT {
            return Err(DetectorError::Artifact(format!(
                "{} scaler has {} offsets and {} scales, expected {}",
                self.kind(),
                offset.len(),
                scale.len(),
                FEATURE_COUNT
            )));
        }

        if offset.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(DetectorError::Artifact(format!(
                "{} scaler contains non-finite parameters",
                self.kind()
            )));
        }

        if let Some(names) = names {
            if names.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
                return Err(DetectorError::FeatureMismatch {
                    expected: names.clone(),
                    found: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                });
            }
        }

        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeatureScaler::Standard { .. } => "standard",
            FeatureScaler::MinMax { .. } => "min_max",
        }
    }

    /// Scale one feature vector.
    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut scaled = [0.0; FEATURE_COUNT];
        match self {
            FeatureScaler::Standard { mean, scale, .. } => {
                for i in 0..FEATURE_COUNT {
                    // Constant features are fitted with zero variance.
                    let s = if scale[i] == 0.0 { 1.0 } else { scale[i] };
                    scaled[i] = (features[i] - mean[i]) / s;
                }
            }
            FeatureScaler::MinMax { min, scale, .. } => {
                for i in 0..FEATURE_COUNT {
                    scaled[i] = features[i] * scale[i] + min[i];
                }
            }
        }
        scaled
    }

    /// Scale a batch of feature vectors.
    pub fn transform_batch(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> FeatureScaler {
        FeatureScaler::from_json(
            r#"{
                "kind": "standard",
                "mean": [10.0, 5.0, 500.0, 2.0, 1.0, 800.0],
                "scale": [5.0, 2.0, 250.0, 1.0, 0.0, 400.0]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_standard_transform() {
        let scaled = standard().transform(&[15.0, 5.0, 0.0, 4.0, 3.0, 400.0]);
        assert_eq!(scaled, [1.0, 0.0, -2.0, 2.0, 2.0, -1.0]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = FeatureScaler::from_json(
            r#"{
                "kind": "min_max",
                "min_": [0.0, 0.0, 0.0, 0.0, 0.0, -1.0],
                "scale_": [0.5, 1.0, 0.125, 1.0, 1.0, 0.25]
            }"#,
        )
        .unwrap();
        let scaled = scaler.transform(&[2.0, 3.0, 8.0, 1.0, 1.0, 8.0]);
        assert_eq!(scaled, [1.0, 3.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_sklearn_aliases_and_feature_names() {
        let scaler = FeatureScaler::from_json(
            r#"{
                "kind": "standard",
                "feature_names_in_": ["koi_period", "koi_duration", "koi_depth", "koi_prad", "koi_srad", "koi_teq"],
                "mean_": [0, 0, 0, 0, 0, 0],
                "scale_": [1, 1, 1, 1, 1, 1]
            }"#,
        )
        .unwrap();
        assert_eq!(scaler.kind(), "standard");
        assert_eq!(scaler.transform(&[1.0; 6]), [1.0; 6]);
    }

    #[test]
    fn test_feature_order_mismatch_rejected() {
        let err = FeatureScaler::from_json(
            r#"{
                "kind": "standard",
                "feature_names": ["koi_duration", "koi_period", "koi_depth", "koi_prad", "koi_srad", "koi_teq"],
                "mean": [0, 0, 0, 0, 0, 0],
                "scale": [1, 1, 1, 1, 1, 1]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DetectorError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = FeatureScaler::from_json(
            r#"{"kind": "standard", "mean": [0, 0, 0], "scale": [1, 1, 1]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DetectorError::Artifact(_)));
    }

    #[test]
    fn test_transform_batch() {
        let scaler = standard();
        let rows = [[10.0, 5.0, 500.0, 2.0, 1.0, 800.0]; 3];
        let scaled = scaler.transform_batch(&rows);
        assert_eq!(scaled.len(), 3);
        assert!(scaled.iter().all(|row| row.iter().all(|&v| v == 0.0)));
    }
}
