//! Terminal and JSON rendering of prediction results.

use crate::batch::{BatchInput, BatchOutput};
use crate::features::{self, FEATURE_LABELS};
use crate::runner::FileReport;
use crate::types::koi::KoiFeatures;
use crate::types::prediction::Prediction;
use clap::ValueEnum;
use csv::StringRecord;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Widest a preview cell may render before it is truncated
const MAX_CELL_WIDTH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Serialize)]
struct PredictionReport<'a> {
    input: &'a KoiFeatures,
    #[serde(flatten)]
    prediction: &'a Prediction,
    label_probability: f64,
}

/// Render a single manual-entry prediction.
pub fn render_prediction<W: Write>(
    out: &mut W,
    koi: &KoiFeatures,
    prediction: &Prediction,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let report = PredictionReport {
                input: koi,
                prediction,
                label_probability: prediction.label_probability(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            for (label, value) in FEATURE_LABELS.iter().zip(features::extract(koi)) {
                writeln!(out, "  {:<32} {}", label, value)?;
            }
            writeln!(out)?;
            if prediction.label.is_exoplanet() {
                writeln!(out, "🪐 This is likely an EXOPLANET!")?;
            } else {
                writeln!(out, "❌ This is likely NOT an exoplanet")?;
            }
            writeln!(
                out,
                "Confidence: {}",
                percent(prediction.label_probability(), 2)
            )?;
            writeln!(
                out,
                "  Exoplanet Probability:     {:>8}",
                percent(prediction.probabilities.exoplanet, 2)
            )?;
            writeln!(
                out,
                "  Not Exoplanet Probability: {:>8}",
                percent(prediction.probabilities.not_exoplanet, 2)
            )
        }
    }
}

/// Render the first rows of an uploaded batch before predicting.
pub fn render_preview<W: Write>(out: &mut W, input: &BatchInput, rows: usize) -> io::Result<()> {
    writeln!(out, "Uploaded Data Preview:")?;
    write_table(out, input.headers(), input.preview(rows).iter().cloned())?;
    if input.len() > rows {
        writeln!(out, "... {} more rows", input.len() - rows)?;
    }
    Ok(())
}

/// Render the results of one batch file as text.
pub fn render_batch<W: Write>(
    out: &mut W,
    output_path: &Path,
    output: &BatchOutput,
    preview_rows: usize,
) -> io::Result<()> {
    writeln!(out, "Prediction Results:")?;
    write_table(
        out,
        &output.output_headers(),
        output.rows().take(preview_rows),
    )?;
    let total = output.predictions().len();
    if total > preview_rows {
        writeln!(out, "... {} more rows", total - preview_rows)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", output.summary())?;
    writeln!(out, "📥 Results written to {}", output_path.display())
}

/// Render every file of a batch run as a single JSON array.
pub fn render_batch_reports<W: Write>(out: &mut W, reports: &[FileReport]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)
}

fn write_table<W, I>(out: &mut W, headers: &StringRecord, rows: I) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = StringRecord>,
{
    let rows: Vec<StringRecord> = rows.collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .chain(std::iter::once(header))
                .map(|cell| cell.chars().count().min(MAX_CELL_WIDTH))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write_row(out, headers, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, row: &StringRecord, widths: &[usize]) -> io::Result<()> {
    let cells: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &width)| format!("{:<width$}", truncate(row.get(i).unwrap_or(""))))
        .collect();
    writeln!(out, "{}", cells.join(" | ").trim_end())
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut short: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    short.push('…');
    short
}

/// Format a probability as a percentage, e.g. `0.8734` → `87.34%`.
pub fn percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::prediction::ClassProbabilities;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.8734, 2), "87.34%");
        assert_eq!(percent(0.125, 1), "12.5%");
        assert_eq!(percent(1.0, 2), "100.00%");
    }

    #[test]
    fn test_render_prediction_text() {
        let koi = KoiFeatures::default();
        let prediction = Prediction::new(ClassProbabilities::from_exoplanet(0.75), 0.5);

        let mut out = Vec::new();
        render_prediction(&mut out, &koi, &prediction, OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("This is likely an EXOPLANET!"));
        assert!(text.contains("Confidence: 75.00%"));
        assert!(text.contains("Not Exoplanet Probability:   25.00%"));
        assert!(text.contains("Orbital Period (days)"));
    }

    #[test]
    fn test_render_prediction_text_reports_predicted_label_probability() {
        let koi = KoiFeatures::default();
        let prediction = Prediction::new(ClassProbabilities::from_exoplanet(0.65), 0.7);

        let mut out = Vec::new();
        render_prediction(&mut out, &koi, &prediction, OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("This is likely NOT an exoplanet"));
        assert!(text.contains("Confidence: 35.00%"));
        assert!(text.contains("Exoplanet Probability:       65.00%"));
    }

    #[test]
    fn test_render_prediction_json() {
        let koi = KoiFeatures::default();
        let prediction = Prediction::new(ClassProbabilities::from_exoplanet(0.1), 0.5);

        let mut out = Vec::new();
        render_prediction(&mut out, &koi, &prediction, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["label"], "Not Exoplanet");
        assert_eq!(value["input"]["koi_teq"], 288.0);
        assert!((value["confidence"].as_f64().unwrap() - 0.9).abs() < 1e-12);
        assert!((value["label_probability"].as_f64().unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_truncate_long_cells() {
        assert_eq!(truncate("short"), "short");
        let long = "a".repeat(40);
        assert_eq!(truncate(&long).chars().count(), MAX_CELL_WIDTH);
    }
}
