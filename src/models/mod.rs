//! Pre-trained artifacts and inference

pub mod classifier;
pub mod inference;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;

pub use classifier::{Classifier, LogisticRegression};
pub use inference::InferenceEngine;
pub use loader::ArtifactLoader;
pub use scaler::FeatureScaler;
