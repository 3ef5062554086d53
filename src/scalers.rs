//! Per-field standardization scalers fitted during model training.
//!
//! The training pipeline fits one scaler per numeric field and exports the
//! parameters as a JSON artifact keyed by field name. At inference time each
//! field is standardized independently with the same parameters.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::features::NUMERIC_FIELDS;

/// Standardization parameters for one numeric field
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StandardScaler {
    pub mean: f64,
    pub scale: f64,
}

impl StandardScaler {
    /// Apply the transform fitted during training
    pub fn transform(&self, raw: f64) -> f64 {
        (raw - self.mean) / self.scale
    }
}

/// The full set of per-field scalers, in feature order.
///
/// Completeness is checked at load time; afterwards scaling has no error
/// path and the bank is shared read-only for the process lifetime.
#[derive(Debug)]
pub struct ScalerBank {
    scalers: Vec<StandardScaler>,
}

impl ScalerBank {
    /// Load the scaler artifact from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler artifact {}", path.display()))?;
        let map: HashMap<String, StandardScaler> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scaler artifact {}", path.display()))?;

        let bank = Self::from_map(&map)?;
        info!(
            path = %path.display(),
            fields = NUMERIC_FIELDS.len(),
            "Scaler bank loaded"
        );
        Ok(bank)
    }

    /// Build a bank from a field-name keyed map, checking completeness
    pub fn from_map(map: &HashMap<String, StandardScaler>) -> Result<Self> {
        let mut scalers = Vec::with_capacity(NUMERIC_FIELDS.len());

        for field in NUMERIC_FIELDS {
            let scaler = map
                .get(field)
                .copied()
                .with_context(|| format!("Scaler artifact is missing field {field:?}"))?;

            if !scaler.scale.is_finite() || scaler.scale == 0.0 {
                bail!("Scaler for field {field:?} has invalid scale {}", scaler.scale);
            }
            if !scaler.mean.is_finite() {
                bail!("Scaler for field {field:?} has invalid mean {}", scaler.mean);
            }

            scalers.push(scaler);
        }

        Ok(Self { scalers })
    }

    /// Standardize a raw value for the numeric field at `field_idx`.
    ///
    /// `field_idx` indexes into [`NUMERIC_FIELDS`]; the bank always holds one
    /// scaler per field.
    pub fn scale(&self, field_idx: usize, raw: f64) -> f64 {
        debug_assert!(
            field_idx < NUMERIC_FIELDS.len(),
            "field_idx {field_idx} out of range for {} numeric fields",
            NUMERIC_FIELDS.len()
        );
        self.scalers[field_idx].transform(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_map() -> HashMap<String, StandardScaler> {
        NUMERIC_FIELDS
            .iter()
            .map(|f| (f.to_string(), StandardScaler { mean: 0.0, scale: 1.0 }))
            .collect()
    }

    #[test]
    fn test_transform() {
        let scaler = StandardScaler { mean: 42.0, scale: 8.0 };
        assert!((scaler.transform(50.0) - 1.0).abs() < 1e-12);
        assert!((scaler.transform(42.0)).abs() < 1e-12);
    }

    #[test]
    fn test_from_map_complete() {
        let bank = ScalerBank::from_map(&identity_map()).unwrap();
        assert_eq!(bank.scale(0, 25.0), 25.0);
    }

    #[test]
    fn test_from_map_missing_field() {
        let mut map = identity_map();
        map.remove("Heart Rate");

        let err = ScalerBank::from_map(&map).unwrap_err();
        assert!(err.to_string().contains("Heart Rate"));
    }

    #[test]
    fn test_from_map_zero_scale() {
        let mut map = identity_map();
        map.insert("Age".to_string(), StandardScaler { mean: 0.0, scale: 0.0 });

        assert!(ScalerBank::from_map(&map).is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_scale_rejects_bad_field_index() {
        let bank = ScalerBank::from_map(&identity_map()).unwrap();
        bank.scale(NUMERIC_FIELDS.len(), 1.0);
    }

    #[test]
    fn test_parses_artifact_json() {
        let json = r#"{
            "Age": {"mean": 42.18, "scale": 8.67},
            "Sleep Duration": {"mean": 7.13, "scale": 0.79},
            "Physical Activity Level": {"mean": 59.17, "scale": 20.83},
            "Stress Level": {"mean": 5.39, "scale": 1.77},
            "Heart Rate": {"mean": 70.17, "scale": 4.13},
            "Daily Steps": {"mean": 6816.84, "scale": 1617.91},
            "Systolic_BP": {"mean": 128.55, "scale": 7.74},
            "Diastolic_BP": {"mean": 84.65, "scale": 6.16}
        }"#;

        let map: HashMap<String, StandardScaler> = serde_json::from_str(json).unwrap();
        let bank = ScalerBank::from_map(&map).unwrap();

        // Age field is index 0
        assert!((bank.scale(0, 42.18)).abs() < 1e-9);
    }
}
