//! Configuration management for the exoplanet detector

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable prefix, e.g. `EXOPLANET__DETECTION__THRESHOLD=0.6`
const ENV_PREFIX: &str = "EXOPLANET";

/// Classifier artifact format
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierBackend {
    /// JSON export of a binary logistic regression
    #[default]
    LogisticRegression,
    /// ONNX graph run through ONNX Runtime (requires the `onnx` feature)
    Onnx,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub models: ModelsConfig,
    pub detection: DetectionConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Fitted feature scaler (JSON)
    pub scaler_path: PathBuf,
    /// Trained classifier
    pub classifier_path: PathBuf,
    /// Classifier artifact format
    pub backend: ClassifierBackend,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            scaler_path: PathBuf::from("models/feature_scaler.json"),
            classifier_path: PathBuf::from("models/exoplanet_classifier.json"),
            backend: ClassifierBackend::LogisticRegression,
            onnx_threads: 1,
        }
    }
}

/// Decision configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// A KOI is labelled an exoplanet when its class-1 probability exceeds this
    pub threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

/// Batch output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Results file for a single batch input
    pub path: PathBuf,
    /// Rows shown in the uploaded-data preview
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("exoplanet_predictions.csv"),
            preview_rows: 5,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path, overlaid with `EXOPLANET__*` variables.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.detection.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("detection.threshold must be within [0, 1], got {}", threshold);
        }
        if self.models.onnx_threads == 0 {
            anyhow::bail!("models.onnx_threads must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.detection.threshold, 0.5);
        assert_eq!(config.models.backend, ClassifierBackend::LogisticRegression);
        assert_eq!(
            config.output.path,
            PathBuf::from("exoplanet_predictions.csv")
        );
        assert_eq!(config.output.preview_rows, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[models]\nbackend = \"onnx\"\nclassifier_path = \"models/koi.onnx\"\n\n[detection]\nthreshold = 0.7"
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.models.backend, ClassifierBackend::Onnx);
        assert_eq!(config.models.classifier_path, PathBuf::from("models/koi.onnx"));
        assert_eq!(
            config.models.scaler_path,
            PathBuf::from("models/feature_scaler.json")
        );
        assert_eq!(config.detection.threshold, 0.7);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from_path("no/such/config.toml").unwrap();
        assert_eq!(config.detection.threshold, 0.5);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = AppConfig::default();
        config.detection.threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
