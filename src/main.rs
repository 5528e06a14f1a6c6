//! Exoplanet Detector - Main Entry Point
//!
//! Loads the feature scaler and classifier once, then classifies KOIs entered
//! on the command line or read from CSV files.

use anyhow::Result;
use clap::Parser;
use exoplanet_detector::{
    cli::{BatchArgs, Cli, Command, PredictArgs},
    config::{AppConfig, LoggingConfig},
    display::{self, OutputFormat},
    features::{self, FEATURE_COLUMNS},
    models::inference::InferenceEngine,
    runner::BatchRunner,
};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when a user-facing error was already reported.
fn run(cli: Cli) -> Result<bool> {
    let mut config = AppConfig::load_from_path(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    init_logging(&config.logging)?;
    info!(config = %cli.config.display(), "Configuration loaded");

    // Artifacts are loaded once and shared by every prediction in this process.
    let engine = InferenceEngine::new(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Predict(args) => run_predict(&mut out, &engine, args, cli.format),
        Command::Batch(args) => run_batch(&mut out, &engine, args, &config, cli.format),
        Command::Info => {
            run_info(&mut out, &engine, &config)?;
            Ok(true)
        }
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("exoplanet_detector={}", logging.level).parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn run_predict<W: Write>(
    out: &mut W,
    engine: &InferenceEngine,
    args: &PredictArgs,
    format: OutputFormat,
) -> Result<bool> {
    let koi = args.to_features();
    features::validate_manual(&koi)?;

    let prediction = engine.predict(&koi)?;
    info!(
        label = %prediction.label,
        exoplanet_probability = prediction.exoplanet_probability(),
        "Manual prediction"
    );

    display::render_prediction(out, &koi, &prediction, format)?;
    Ok(true)
}

fn run_batch<W: Write>(
    out: &mut W,
    engine: &InferenceEngine,
    args: &BatchArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<bool> {
    let preview_rows = args.preview.unwrap_or(config.output.preview_rows);
    let runner = BatchRunner::new(engine, preview_rows, format);
    let run = runner.run(out, &mut io::stderr(), &args.inputs, |input| {
        args.output_path(input, config)
    })?;

    if !run.all_ok() {
        warn!(
            rejected = run.rejected(),
            files = run.files.len(),
            "Batch finished with rejected files"
        );
    }
    Ok(run.all_ok())
}

fn run_info<W: Write>(out: &mut W, engine: &InferenceEngine, config: &AppConfig) -> Result<()> {
    writeln!(
        out,
        "Scaler:     {} ({})",
        engine.scaler().kind(),
        config.models.scaler_path.display()
    )?;
    writeln!(
        out,
        "Classifier: {} ({})",
        engine.classifier_name(),
        config.models.classifier_path.display()
    )?;
    writeln!(out, "Threshold:  {}", engine.threshold())?;
    writeln!(out, "Features:   {}", FEATURE_COLUMNS.join(", "))?;
    Ok(())
}
