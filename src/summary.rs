//! Summary statistics for a batch run.

use crate::types::prediction::Prediction;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Number of exoplanet-probability histogram buckets
const BUCKETS: usize = 10;

/// Aggregate view of one batch of predictions
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Identifies this run in logs and JSON output
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Rows classified
    pub total: usize,
    /// Rows labelled as exoplanets
    pub exoplanet_count: usize,
    /// `exoplanet_count / total`, 0 for an empty batch
    pub exoplanet_fraction: f64,
    pub mean_exoplanet_probability: f64,
    pub mean_confidence: f64,
    /// Exoplanet-probability distribution in tenths
    pub probability_buckets: [u64; BUCKETS],
    /// Time spent scaling and classifying
    #[serde(rename = "elapsed_us", serialize_with = "serialize_micros")]
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn from_predictions(predictions: &[Prediction], elapsed: Duration) -> Self {
        let total = predictions.len();
        let exoplanet_count = predictions
            .iter()
            .filter(|p| p.label.is_exoplanet())
            .count();

        let mut probability_buckets = [0u64; BUCKETS];
        for prediction in predictions {
            let bucket = (prediction.exoplanet_probability() * BUCKETS as f64)
                .min((BUCKETS - 1) as f64) as usize;
            probability_buckets[bucket] += 1;
        }

        let mean = |f: fn(&Prediction) -> f64| {
            if total == 0 {
                0.0
            } else {
                predictions.iter().map(f).sum::<f64>() / total as f64
            }
        };

        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            total,
            exoplanet_count,
            exoplanet_fraction: if total == 0 {
                0.0
            } else {
                exoplanet_count as f64 / total as f64
            },
            mean_exoplanet_probability: mean(|p| p.probabilities.exoplanet),
            mean_confidence: mean(|p| p.confidence),
            probability_buckets,
            elapsed,
        }
    }

    pub fn elapsed_us(&self) -> u64 {
        u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX)
    }

    /// Log the summary and probability histogram.
    pub fn log(&self) {
        info!(
            run_id = %self.run_id,
            total = self.total,
            exoplanets = self.exoplanet_count,
            mean_probability = self.mean_exoplanet_probability,
            mean_confidence = self.mean_confidence,
            elapsed_us = self.elapsed_us(),
            "{}",
            self
        );

        for (i, &count) in self.probability_buckets.iter().enumerate() {
            let pct = if self.total > 0 {
                (count as f64 / self.total as f64) * 100.0
            } else {
                0.0
            };
            let bar = "█".repeat(((pct / 5.0) as usize).min(20));
            info!(
                "  P(exoplanet) {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
    }
}

fn serialize_micros<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} potential exoplanets out of {} objects ({:.1}%)",
            self.exoplanet_count,
            self.total,
            self.exoplanet_fraction * 100.0
        )
    }
}
