//! Command-line interface
//!
//! ```bash
//! exoplanet-detector predict --period 9.49 --depth 615.8 --prad 2.26
//! exoplanet-detector batch kois.csv --output results.csv
//! exoplanet-detector batch q1.csv q2.csv --format json
//! exoplanet-detector info
//! ```

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::display::OutputFormat;
use crate::types::koi::KoiFeatures;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Predict whether a Kepler Object of Interest (KOI) is an exoplanet
#[derive(Parser, Debug, Clone)]
#[command(name = "exoplanet-detector", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH, env = "EXOPLANET_CONFIG")]
    pub config: PathBuf,

    /// Override the feature scaler artifact
    #[arg(long, global = true)]
    pub scaler: Option<PathBuf>,

    /// Override the classifier artifact
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Override the decision threshold
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify one KOI from parameters entered on the command line
    Predict(PredictArgs),

    /// Classify every row of one or more CSV files
    Batch(BatchArgs),

    /// Show the loaded artifacts and expected feature order
    Info,
}

/// Manually entered planet parameters. Values must be non-negative.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    /// Orbital period (days)
    #[arg(long, default_value_t = 365.25, value_parser = non_negative)]
    pub period: f64,

    /// Transit duration (hours)
    #[arg(long, default_value_t = 6.5, value_parser = non_negative)]
    pub duration: f64,

    /// Transit depth (ppm)
    #[arg(long, default_value_t = 500.0, value_parser = non_negative)]
    pub depth: f64,

    /// Planetary radius (Earth radii)
    #[arg(long, default_value_t = 1.0, value_parser = non_negative)]
    pub prad: f64,

    /// Stellar radius (Solar radii)
    #[arg(long, default_value_t = 1.0, value_parser = non_negative)]
    pub srad: f64,

    /// Equilibrium temperature (K)
    #[arg(long, default_value_t = 288.0, value_parser = non_negative)]
    pub teq: f64,
}

impl PredictArgs {
    pub fn to_features(&self) -> KoiFeatures {
        KoiFeatures::new(
            self.period,
            self.duration,
            self.depth,
            self.prad,
            self.srad,
            self.teq,
        )
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct BatchArgs {
    /// CSV files with koi_period, koi_duration, koi_depth, koi_prad, koi_srad, koi_teq columns
    #[arg(required = true, value_name = "CSV")]
    pub inputs: Vec<PathBuf>,

    /// Results file (single input only; defaults to output.path from the configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows to show in previews (defaults to output.preview_rows)
    #[arg(long)]
    pub preview: Option<usize>,
}

impl BatchArgs {
    /// Where results for `input` are written.
    ///
    /// A single input uses `--output` or the configured path; several inputs
    /// each get `<stem>_predictions.csv` beside the input file.
    pub fn output_path(&self, input: &std::path::Path, config: &AppConfig) -> PathBuf {
        if self.inputs.len() == 1 {
            return self
                .output
                .clone()
                .unwrap_or_else(|| config.output.path.clone());
        }
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "batch".to_string());
        input.with_file_name(format!("{stem}_predictions.csv"))
    }
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(scaler) = &self.scaler {
            config.models.scaler_path = scaler.clone();
        }
        if let Some(model) = &self.model {
            config.models.classifier_path = model.clone();
        }
        if let Some(threshold) = self.threshold {
            config.detection.threshold = threshold;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}

fn non_negative(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("must be a non-negative number, got {s}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_predict_defaults() {
        let cli = Cli::parse_from(["exoplanet-detector", "predict"]);
        match cli.command {
            Command::Predict(args) => assert_eq!(args.to_features(), KoiFeatures::default()),
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_predict_rejects_negative() {
        let result = Cli::try_parse_from(["exoplanet-detector", "predict", "--depth", "-5"]);
        assert!(result.is_err());
        let result = Cli::try_parse_from(["exoplanet-detector", "predict", "--teq", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "exoplanet-detector",
            "info",
            "--threshold",
            "0.7",
            "--model",
            "m.json",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.detection.threshold, 0.7);
        assert_eq!(config.models.classifier_path, PathBuf::from("m.json"));
    }

    #[test]
    fn test_batch_output_paths() {
        let config = AppConfig::default();

        let single = BatchArgs {
            inputs: vec![PathBuf::from("data/kois.csv")],
            output: None,
            preview: None,
        };
        assert_eq!(
            single.output_path(&single.inputs[0], &config),
            PathBuf::from("exoplanet_predictions.csv")
        );

        let several = BatchArgs {
            inputs: vec![PathBuf::from("data/q1.csv"), PathBuf::from("data/q2.csv")],
            output: Some(PathBuf::from("ignored.csv")),
            preview: None,
        };
        assert_eq!(
            several.output_path(&several.inputs[1], &config),
            PathBuf::from("data/q2_predictions.csv")
        );
    }
}
