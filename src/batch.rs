//! Batch prediction over CSV files.
//!
//! Every original column is carried through to the output; the prediction
//! columns are appended after them.

use crate::error::{DetectorError, Result};
use crate::features;
use crate::models::inference::InferenceEngine;
use crate::summary::BatchSummary;
use crate::types::koi::KoiFeatures;
use crate::types::prediction::Prediction;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Columns appended to each row of the results file
pub const OUTPUT_COLUMNS: [&str; 3] = ["Prediction", "Confidence", "Exoplanet_Probability"];

/// A parsed batch file whose required columns are all present.
#[derive(Debug, Clone)]
pub struct BatchInput {
    headers: StringRecord,
    records: Vec<StringRecord>,
    kois: Vec<KoiFeatures>,
}

impl BatchInput {
    /// Open and parse a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DetectorError::read(format!("{}: {}", path.display(), e)))?;
        let input = Self::read(file)?;
        info!(path = %path.display(), rows = input.len(), "Batch file loaded");
        Ok(input)
    }

    /// Parse CSV data with a header row.
    ///
    /// Column presence is checked before any row is parsed, so a file missing
    /// a required column fails with [`DetectorError::MissingColumns`]. A file
    /// with no header row at all is a read error.
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = reader.headers().map_err(DetectorError::read)?.clone();
        if headers.iter().all(str::is_empty) {
            return Err(DetectorError::read("no columns to parse from file"));
        }
        features::require_columns(headers.iter())?;

        let mut records = Vec::new();
        let mut kois = Vec::new();
        for (index, result) in reader.records().enumerate() {
            // 1-based data row, header excluded
            let row = index + 1;
            let record = result.map_err(DetectorError::read)?;
            let koi: KoiFeatures = record
                .deserialize(Some(&headers))
                .map_err(|e| DetectorError::read(format!("row {row}: {e}")))?;
            if let Some((column, value)) = features::FEATURE_COLUMNS
                .into_iter()
                .zip(features::extract(&koi))
                .find(|(_, value)| !value.is_finite())
            {
                return Err(DetectorError::read(format!(
                    "row {row}: {column} is not a finite number ({value})"
                )));
            }
            records.push(record);
            kois.push(koi);
        }

        debug!(columns = headers.len(), rows = records.len(), "Parsed batch input");
        Ok(Self {
            headers,
            records,
            kois,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn kois(&self) -> &[KoiFeatures] {
        &self.kois
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` rows as originally read.
    pub fn preview(&self, n: usize) -> &[StringRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Classify every row.
    pub fn predict(self, engine: &InferenceEngine) -> Result<BatchOutput> {
        let start = Instant::now();
        let predictions = engine.predict_batch(&self.kois)?;
        let summary = BatchSummary::from_predictions(&predictions, start.elapsed());

        info!(
            rows = predictions.len(),
            exoplanets = summary.exoplanet_count,
            elapsed_us = summary.elapsed_us(),
            "Batch prediction complete"
        );

        Ok(BatchOutput {
            headers: self.headers,
            records: self.records,
            predictions,
            summary,
        })
    }
}

/// Input rows paired with their predictions.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    headers: StringRecord,
    records: Vec<StringRecord>,
    predictions: Vec<Prediction>,
    summary: BatchSummary,
}

impl BatchOutput {
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }

    /// Header row of the results file: original columns, then [`OUTPUT_COLUMNS`].
    pub fn output_headers(&self) -> StringRecord {
        let mut headers = self.headers.clone();
        for column in OUTPUT_COLUMNS {
            headers.push_field(column);
        }
        headers
    }

    /// Result rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = StringRecord> + '_ {
        self.records
            .iter()
            .zip(&self.predictions)
            .map(|(record, prediction)| {
                let mut row = record.clone();
                row.push_field(prediction.label.as_str());
                row.push_field(&prediction.confidence.to_string());
                row.push_field(&prediction.exoplanet_probability().to_string());
                row
            })
    }

    /// Write the augmented CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(&self.output_headers())?;
        for row in self.rows() {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the augmented CSV to a file.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_csv(file)?;
        info!(path = %path.display(), rows = self.predictions.len(), "Results written");
        Ok(())
    }
}
