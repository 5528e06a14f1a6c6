//! Type definitions for the exoplanet detector

pub mod koi;
pub mod prediction;

pub use koi::KoiFeatures;
pub use prediction::{ClassProbabilities, Classification, Prediction};
