//! Multi-file batch runs.
//!
//! A rejected file is reported and skipped; the remaining files are still
//! classified with the same engine.

use crate::batch::BatchInput;
use crate::display::{self, OutputFormat};
use crate::error::DetectorError;
use crate::models::inference::InferenceEngine;
use crate::summary::BatchSummary;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::error;

/// Outcome of one input file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(flatten)]
    pub summary: Option<BatchSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn written(input: &Path, output: &Path, summary: BatchSummary) -> Self {
        Self {
            input: input.display().to_string(),
            output: Some(output.display().to_string()),
            summary: Some(summary),
            error: None,
        }
    }

    fn rejected(input: &Path, error: &DetectorError) -> Self {
        Self {
            input: input.display().to_string(),
            output: None,
            summary: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Every file of one `batch` invocation, in input order
#[derive(Debug, Clone, Default)]
pub struct BatchRun {
    pub files: Vec<FileReport>,
}

impl BatchRun {
    /// False when any input was rejected; the process then exits non-zero.
    pub fn all_ok(&self) -> bool {
        self.files.iter().all(FileReport::is_ok)
    }

    pub fn rejected(&self) -> usize {
        self.files.iter().filter(|f| !f.is_ok()).count()
    }
}

pub struct BatchRunner<'a> {
    engine: &'a InferenceEngine,
    preview_rows: usize,
    format: OutputFormat,
}

impl<'a> BatchRunner<'a> {
    pub fn new(engine: &'a InferenceEngine, preview_rows: usize, format: OutputFormat) -> Self {
        Self {
            engine,
            preview_rows,
            format,
        }
    }

    /// Classify each input and write its results to `output_path(input)`.
    ///
    /// Results go to `out`; rejected files are reported on `err`. Only a
    /// failure to write to either stream aborts the run.
    pub fn run<W, E, F>(
        &self,
        out: &mut W,
        err: &mut E,
        inputs: &[PathBuf],
        output_path: F,
    ) -> io::Result<BatchRun>
    where
        W: Write,
        E: Write,
        F: Fn(&Path) -> PathBuf,
    {
        let mut run = BatchRun::default();

        for input_path in inputs {
            let report = match self.run_file(out, input_path, &output_path(input_path))? {
                Ok(report) => report,
                Err(e) => {
                    error!(path = %input_path.display(), error = %e, "Batch input rejected");
                    writeln!(err, "{}: {e}", input_path.display())?;
                    FileReport::rejected(input_path, &e)
                }
            };
            run.files.push(report);
        }

        if self.format == OutputFormat::Json {
            display::render_batch_reports(out, &run.files)?;
        }
        Ok(run)
    }

    fn run_file<W: Write>(
        &self,
        out: &mut W,
        input_path: &Path,
        output_path: &Path,
    ) -> io::Result<Result<FileReport, DetectorError>> {
        let input = match BatchInput::from_path(input_path) {
            Ok(input) => input,
            Err(e) => return Ok(Err(e)),
        };

        let text = self.format == OutputFormat::Text;
        if text && self.preview_rows > 0 {
            display::render_preview(out, &input, self.preview_rows)?;
            writeln!(out)?;
        }

        let output = match input
            .predict(self.engine)
            .and_then(|output| output.write_to_path(output_path).map(|()| output))
        {
            Ok(output) => output,
            Err(e) => return Ok(Err(e)),
        };
        output.summary().log();

        if text {
            display::render_batch(out, output_path, &output, self.preview_rows)?;
        }
        Ok(Ok(FileReport::written(
            input_path,
            output_path,
            output.summary().clone(),
        )))
    }
}
