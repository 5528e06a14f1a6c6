//! ONNX Runtime classifier backend

use crate::error::{DetectorError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::models::classifier::Classifier;
use crate::types::prediction::ClassProbabilities;
use anyhow::Context;
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier exported to ONNX (e.g. via skl2onnx).
pub struct OnnxClassifier {
    /// Session runs need exclusive access
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Load a model file and resolve its input and probability output names.
    pub fn load<P: AsRef<Path>>(path: P, intra_threads: usize) -> anyhow::Result<Self> {
        let path = path.as_ref();

        ort::init().commit()?;
        info!(path = %path.display(), threads = intra_threads, "Loading ONNX classifier");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load ONNX model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "probabilities".to_string());

        info!(input = %input_name, output = %output_name, "ONNX classifier loaded");

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    fn run(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<ClassProbabilities>> {
        let data: Vec<f32> = rows
            .iter()
            .flat_map(|row| row.iter().map(|&v| v as f32))
            .collect();
        let shape = vec![rows.len() as i64, FEATURE_COUNT as i64];
        let input = Tensor::from_array((shape, data)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input])?;

        extract_probabilities(&outputs, &self.output_name, rows.len())
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<ClassProbabilities>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.run(rows)
            .map_err(|e| DetectorError::Inference(format!("{e:#}")))
    }
}

/// Read class probabilities from the named output, falling back to any
/// non-label output. Handles plain tensors and scikit-learn's seq(map) ZipMap.
fn extract_probabilities(
    outputs: &SessionOutputs,
    output_name: &str,
    batch: usize,
) -> anyhow::Result<Vec<ClassProbabilities>> {
    if let Some(output) = outputs.get(output_name) {
        if let Some(probs) = extract_from_value(output, batch)? {
            return Ok(probs);
        }
    }

    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }
        if let Some(probs) = extract_from_value(&output, batch)? {
            debug!(output = %name, "Extracted probabilities from fallback output");
            return Ok(probs);
        }
    }

    anyhow::bail!("model produced no probability output")
}

fn extract_from_value(
    value: &DynValue,
    batch: usize,
) -> anyhow::Result<Option<Vec<ClassProbabilities>>> {
    if let Ok((shape, data)) = value.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return from_tensor(&dims, data, batch).map(Some);
    }

    if DynSequenceValueType::can_downcast(&value.dtype()) {
        return from_sequence_map(value, batch).map(Some);
    }

    Ok(None)
}

/// `[N, 2]` per-class probabilities, or `[N, 1]` / `[N]` class-1 probability.
fn from_tensor(
    dims: &[i64],
    data: &[f32],
    batch: usize,
) -> anyhow::Result<Vec<ClassProbabilities>> {
    let classes = match dims {
        [n, c] if *n as usize == batch => *c as usize,
        [n] if *n as usize == batch => 1,
        _ => anyhow::bail!("unexpected probability tensor shape {:?}", dims),
    };

    let probs = match classes {
        1 => data
            .iter()
            .map(|&p| ClassProbabilities::from_exoplanet(p as f64))
            .collect(),
        2 => data
            .chunks_exact(2)
            .map(|pair| ClassProbabilities::normalized(pair[0] as f64, pair[1] as f64))
            .collect(),
        other => anyhow::bail!("binary classifier expected, model reports {} classes", other),
    };
    Ok(probs)
}

/// seq(map(int64, float)), one map per row
fn from_sequence_map(value: &DynValue, batch: usize) -> anyhow::Result<Vec<ClassProbabilities>> {
    let allocator = Allocator::default();
    let sequence = value
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;
    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

    if maps.len() != batch {
        anyhow::bail!("expected {} probability maps, found {}", batch, maps.len());
    }

    maps.iter()
        .map(|map| -> anyhow::Result<ClassProbabilities> {
            let pairs = map.try_extract_key_values::<i64, f32>()?;
            let mut not_exoplanet = 0.0;
            let mut exoplanet = 0.0;
            for (class_id, prob) in pairs {
                match class_id {
                    0 => not_exoplanet = prob as f64,
                    1 => exoplanet = prob as f64,
                    _ => {}
                }
            }
            Ok(ClassProbabilities::normalized(not_exoplanet, exoplanet))
        })
        .collect()
}
