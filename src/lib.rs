//! Exoplanet Detector Library
//!
//! Classifies Kepler Objects of Interest with a pre-fitted feature scaler and
//! a pre-trained binary classifier, from manual entry or CSV batches.

pub mod batch;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod features;
pub mod models;
pub mod runner;
pub mod summary;
pub mod types;

pub use batch::{BatchInput, BatchOutput};
pub use config::AppConfig;
pub use error::DetectorError;
pub use models::inference::InferenceEngine;
pub use runner::{BatchRun, BatchRunner};
pub use summary::BatchSummary;
pub use types::{koi::KoiFeatures, prediction::Prediction};
