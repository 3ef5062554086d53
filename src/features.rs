//! Feature assembly for sleep score model inference.
//!
//! This module maps a validated [`HealthProfile`] into the feature vector
//! the regression models were trained on: three categorical codes followed
//! by eight standardized numeric values, in a fixed order.

use crate::scalers::ScalerBank;
use crate::types::profile::HealthProfile;

/// Number of features in the model input vector
pub const FEATURE_COUNT: usize = 11;

/// Numeric fields in training order. Scaled values occupy positions 3..11
/// of the feature vector, after the three categorical codes.
pub const NUMERIC_FIELDS: [&str; 8] = [
    "Age",
    "Sleep Duration",
    "Physical Activity Level",
    "Stress Level",
    "Heart Rate",
    "Daily Steps",
    "Systolic_BP",
    "Diastolic_BP",
];

/// Assembles model input features from a health profile.
///
/// The field order must exactly match the order the models were trained on;
/// reordering silently corrupts predictions. Tests pin both the length and
/// the order.
pub struct FeatureAssembler {
    scalers: ScalerBank,
    invert_sleep_duration: bool,
}

impl FeatureAssembler {
    /// Create an assembler over a loaded scaler bank.
    ///
    /// `invert_sleep_duration` feeds `12 - duration` to the scaler instead of
    /// the raw duration. The trained artifacts expect the inverted value
    /// (the training pipeline modeled "sleep debt" rather than hours slept),
    /// so this defaults to on in the shipped configuration; it is exposed as
    /// an explicit switch rather than buried in the transform.
    pub fn new(scalers: ScalerBank, invert_sleep_duration: bool) -> Self {
        Self {
            scalers,
            invert_sleep_duration,
        }
    }

    /// Assemble the fixed-order feature vector for one profile.
    ///
    /// The profile is assumed range-valid (see [`HealthProfile::validate`])
    /// and the scaler bank is complete by construction, so assembly has no
    /// error path.
    pub fn assemble(&self, profile: &HealthProfile) -> Vec<f32> {
        let mut features = Vec::with_capacity(FEATURE_COUNT);

        // Categorical codes (3)
        features.push(profile.gender.code() as f32);
        features.push(profile.bmi_category.code() as f32);
        features.push(profile.sleep_disorder.code() as f32);

        let sleep_duration = if self.invert_sleep_duration {
            12.0 - profile.sleep_duration
        } else {
            profile.sleep_duration
        };

        // Raw numeric values in NUMERIC_FIELDS order
        let raw = [
            profile.age as f64,
            sleep_duration,
            profile.physical_activity as f64,
            profile.stress_level as f64,
            profile.heart_rate as f64,
            profile.daily_steps as f64,
            profile.systolic_bp as f64,
            profile.diastolic_bp as f64,
        ];

        for (idx, &value) in raw.iter().enumerate() {
            features.push(self.scalers.scale(idx, value) as f32);
        }

        features
    }

    /// Number of features produced
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Feature names in assembly order
    pub fn feature_names(&self) -> Vec<&'static str> {
        let mut names = vec!["Gender", "BMI Category", "Sleep Disorder"];
        names.extend(NUMERIC_FIELDS);
        names
    }
}
