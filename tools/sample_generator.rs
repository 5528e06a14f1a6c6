//! KOI Sample Generator
//!
//! Writes a synthetic CSV of Kepler Objects of Interest for trying the
//! batch pipeline. Rows mix planet-like transits with eclipsing-binary-like
//! false positives.

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "koi-sample-generator", about = "Generate a synthetic KOI CSV")]
struct Args {
    /// Number of rows
    #[arg(short = 'n', long, default_value_t = 100)]
    count: u64,

    /// Fraction of rows drawn from the false-positive profile
    #[arg(long, default_value_t = 0.3)]
    false_positive_rate: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// One CSV row; extra identifier column first, as in the KOI cumulative table
#[derive(Debug, Serialize)]
struct KoiRow {
    kepoi_name: String,
    koi_period: f64,
    koi_duration: f64,
    koi_depth: f64,
    koi_prad: f64,
    koi_srad: f64,
    koi_teq: f64,
}

struct KoiGenerator {
    rng: StdRng,
    counter: u64,
}

impl KoiGenerator {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, counter: 0 }
    }

    fn next_name(&mut self) -> String {
        self.counter += 1;
        format!("K{:05}.01", self.counter)
    }

    /// Shallow transit of a planet-sized body
    fn generate_planet(&mut self) -> KoiRow {
        let koi_srad = self.rng.gen_range(0.6..1.5);
        let koi_prad: f64 = self.rng.gen_range(0.5..15.0);
        // Depth scales with the radius ratio squared (1 R_sun = 109 R_earth).
        let ratio = koi_prad / (koi_srad * 109.0);
        let koi_depth = ratio * ratio * 1e6 * self.rng.gen_range(0.8..1.2);

        KoiRow {
            kepoi_name: self.next_name(),
            koi_period: self.rng.gen_range(0.5..400.0),
            koi_duration: self.rng.gen_range(1.0..12.0),
            koi_depth: round(koi_depth, 1),
            koi_prad: round(koi_prad, 2),
            koi_srad: round(koi_srad, 3),
            koi_teq: round(self.rng.gen_range(200.0..2500.0), 0),
        }
    }

    /// Deep, long eclipse with an implausibly large companion
    fn generate_false_positive(&mut self) -> KoiRow {
        KoiRow {
            kepoi_name: self.next_name(),
            koi_period: self.rng.gen_range(0.3..50.0),
            koi_duration: self.rng.gen_range(2.0..20.0),
            koi_depth: round(self.rng.gen_range(20_000.0..500_000.0), 1),
            koi_prad: round(self.rng.gen_range(20.0..200.0), 2),
            koi_srad: round(self.rng.gen_range(0.8..3.0), 3),
            koi_teq: round(self.rng.gen_range(800.0..4000.0), 0),
        }
    }
}

fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("koi_sample_generator=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.false_positive_rate) {
        anyhow::bail!("--false-positive-rate must be within [0, 1]");
    }

    info!(
        count = args.count,
        false_positive_rate = args.false_positive_rate,
        seed = ?args.seed,
        "Generating KOI sample"
    );

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = csv::Writer::from_writer(sink);

    let mut generator = KoiGenerator::new(args.seed);
    let mut planets = 0;
    let mut false_positives = 0;

    for _ in 0..args.count {
        let row = if generator.rng.gen_bool(args.false_positive_rate) {
            false_positives += 1;
            generator.generate_false_positive()
        } else {
            planets += 1;
            generator.generate_planet()
        };
        writer.serialize(&row)?;
    }
    writer.flush()?;

    info!(
        planets = planets,
        false_positives = false_positives,
        "Completed! Wrote {} rows",
        args.count
    );

    Ok(())
}
