//! Classifier backends

use crate::error::{DetectorError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::types::prediction::ClassProbabilities;
use serde::Deserialize;

/// A trained binary classifier operating on scaled feature vectors.
pub trait Classifier: Send + Sync {
    /// Backend name used in logs and `info` output
    fn name(&self) -> &str;

    /// Class probabilities for each scaled row, in input order.
    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<ClassProbabilities>>;
}

/// Coefficients may be exported flat or as a one-row matrix (`coef_` shape `[1, n]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Coefficients {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

/// Intercept may be exported as a scalar or a one-element array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Intercept {
    Scalar(f64),
    Array(Vec<f64>),
}

#[derive(Debug, Clone, Deserialize)]
struct LogisticRegressionArtifact {
    #[serde(alias = "coef_")]
    coefficients: Coefficients,
    #[serde(alias = "intercept_")]
    intercept: Intercept,
}

/// Binary logistic regression loaded from exported coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    coefficients: FeatureVector,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: FeatureVector, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Parse a JSON artifact with `coefficients`/`coef_` and `intercept`/`intercept_`.
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: LogisticRegressionArtifact = serde_json::from_str(json)?;

        let coefficients = match artifact.coefficients {
            Coefficients::Flat(values) => values,
            Coefficients::Nested(mut rows) if rows.len() == 1 => rows.remove(0),
            Coefficients::Nested(rows) => {
                return Err(DetectorError::Artifact(format!(
                    "expected a single coefficient row for a binary model, found {}",
                    rows.len()
                )))
            }
        };
        let coefficients: FeatureVector = coefficients.try_into().map_err(|v: Vec<f64>| {
            DetectorError::Artifact(format!(
                "model has {} coefficients, expected {}",
                v.len(),
                FEATURE_COUNT
            ))
        })?;

        let intercept = match artifact.intercept {
            Intercept::Scalar(value) => value,
            Intercept::Array(values) if values.len() == 1 => values[0],
            Intercept::Array(values) => {
                return Err(DetectorError::Artifact(format!(
                    "expected a single intercept, found {}",
                    values.len()
                )))
            }
        };

        if coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            return Err(DetectorError::Artifact(
                "model contains non-finite parameters".to_string(),
            ));
        }

        Ok(Self::new(coefficients, intercept))
    }

    /// Raw decision value `w · x + b`
    pub fn decision_function(&self, row: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(row.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<ClassProbabilities>> {
        Ok(rows
            .iter()
            .map(|row| ClassProbabilities::from_exoplanet(sigmoid(self.decision_function(row))))
            .collect())
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
