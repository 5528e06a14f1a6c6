//! Feature extraction for exoplanet classifier inference.
//!
//! The classifier and scaler were fitted on six KOI columns in a fixed order.
//! Everything that turns user input into a model input goes through here so
//! that manual entry and CSV batches produce identical vectors.

use crate::error::{DetectorError, Result};
use crate::types::koi::KoiFeatures;

/// Number of model input features
pub const FEATURE_COUNT: usize = 6;

/// Model input vector, in [`FEATURE_COLUMNS`] order
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Required CSV columns, in the order the scaler expects them.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "koi_period",
    "koi_duration",
    "koi_depth",
    "koi_prad",
    "koi_srad",
    "koi_teq",
];

/// Human-readable labels for each feature, same order as [`FEATURE_COLUMNS`].
pub const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Orbital Period (days)",
    "Transit Duration (hours)",
    "Transit Depth (ppm)",
    "Planetary Radius (Earth radii)",
    "Stellar Radius (Solar radii)",
    "Equilibrium Temperature (K)",
];

/// Extract the model-ordered feature vector from a KOI record.
pub fn extract(koi: &KoiFeatures) -> FeatureVector {
    [
        koi.koi_period,
        koi.koi_duration,
        koi.koi_depth,
        koi.koi_prad,
        koi.koi_srad,
        koi.koi_teq,
    ]
}

/// Required columns absent from `headers`, in model order.
///
/// Matching is exact and case-sensitive.
pub fn missing_columns<'a, I>(headers: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = headers.into_iter().collect();
    FEATURE_COLUMNS
        .iter()
        .copied()
        .filter(|column| !present.contains(column))
        .collect()
}

/// Fail with [`DetectorError::MissingColumns`] unless every required column is present.
pub fn require_columns<'a, I>(headers: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let missing = missing_columns(headers);
    if missing.is_empty() {
        return Ok(());
    }
    Err(DetectorError::MissingColumns {
        expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        missing: missing.into_iter().map(str::to_string).collect(),
    })
}

/// Enforce the manual-entry constraint: every field finite and non-negative.
pub fn validate_manual(koi: &KoiFeatures) -> Result<()> {
    for (field, value) in FEATURE_COLUMNS.into_iter().zip(extract(koi)) {
        if !value.is_finite() || value < 0.0 {
            return Err(DetectorError::InvalidFeature { field, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_preserves_model_order() {
        let koi = KoiFeatures::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(extract(&koi), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_missing_columns() {
        let headers = ["koi_period", "koi_depth", "koi_prad", "extra"];
        assert_eq!(
            missing_columns(headers),
            vec!["koi_duration", "koi_srad", "koi_teq"]
        );
        assert!(missing_columns(FEATURE_COLUMNS).is_empty());
    }

    #[test]
    fn test_missing_columns_is_case_sensitive() {
        let headers = [
            "KOI_PERIOD",
            "koi_duration",
            "koi_depth",
            "koi_prad",
            "koi_srad",
            "koi_teq",
        ];
        assert_eq!(missing_columns(headers), vec!["koi_period"]);
    }

    #[test]
    fn test_require_columns_error() {
        let err = require_columns(["koi_period"]).unwrap_err();
        match err {
            DetectorError::MissingColumns { expected, missing } => {
                assert_eq!(expected.len(), FEATURE_COUNT);
                assert_eq!(missing.len(), 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_manual() {
        assert!(validate_manual(&KoiFeatures::default()).is_ok());
        assert!(validate_manual(&KoiFeatures::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)).is_ok());

        let mut negative = KoiFeatures::default();
        negative.koi_srad = -1.0;
        match validate_manual(&negative) {
            Err(DetectorError::InvalidFeature { field, .. }) => assert_eq!(field, "koi_srad"),
            other => panic!("expected invalid feature, got {other:?}"),
        }

        let mut nan = KoiFeatures::default();
        nan.koi_teq = f64::NAN;
        assert!(validate_manual(&nan).is_err());
    }
}
