//! Kepler Object of Interest observation record

use serde::{Deserialize, Serialize};

/// The six transit and stellar parameters the classifier was trained on.
///
/// Field names double as the CSV column names expected in batch files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KoiFeatures {
    /// Orbital period (days)
    pub koi_period: f64,

    /// Transit duration (hours)
    pub koi_duration: f64,

    /// Transit depth (ppm)
    pub koi_depth: f64,

    /// Planetary radius (Earth radii)
    pub koi_prad: f64,

    /// Stellar radius (Solar radii)
    pub koi_srad: f64,

    /// Equilibrium temperature (K)
    pub koi_teq: f64,
}

impl KoiFeatures {
    /// Create a record from values given in model order.
    pub fn new(
        koi_period: f64,
        koi_duration: f64,
        koi_depth: f64,
        koi_prad: f64,
        koi_srad: f64,
        koi_teq: f64,
    ) -> Self {
        Self {
            koi_period,
            koi_duration,
            koi_depth,
            koi_prad,
            koi_srad,
            koi_teq,
        }
    }

    /// Build a record from a model-ordered feature vector.
    pub fn from_array(values: [f64; 6]) -> Self {
        let [koi_period, koi_duration, koi_depth, koi_prad, koi_srad, koi_teq] = values;
        Self::new(koi_period, koi_duration, koi_depth, koi_prad, koi_srad, koi_teq)
    }
}

impl Default for KoiFeatures {
    /// An Earth-like transit around a Sun-like star.
    fn default() -> Self {
        Self::new(365.25, 6.5, 500.0, 1.0, 1.0, 288.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_earth_analog() {
        let koi = KoiFeatures::default();
        assert_eq!(koi.koi_period, 365.25);
        assert_eq!(koi.koi_duration, 6.5);
        assert_eq!(koi.koi_depth, 500.0);
        assert_eq!(koi.koi_teq, 288.0);
    }

    #[test]
    fn test_deserialize_ignores_extra_columns() {
        let mut reader = csv::Reader::from_reader(
            "kepoi_name,koi_period,koi_duration,koi_depth,koi_prad,koi_srad,koi_teq\n\
             K00752.01,9.49,2.96,615.8,2.26,0.93,793\n"
                .as_bytes(),
        );
        let koi: KoiFeatures = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(koi.koi_period, 9.49);
        assert_eq!(koi.koi_teq, 793.0);
    }
}
