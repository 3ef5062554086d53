//! Health profile input types for sleep score prediction

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Gender of the respondent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Integer code used during model training
    pub fn code(self) -> i64 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }
}

/// BMI category as recorded in the training data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum BmiCategory {
    Normal,
    Obese,
    Overweight,
    Underweight,
}

impl BmiCategory {
    /// Integer code used during model training
    pub fn code(self) -> i64 {
        match self {
            BmiCategory::Normal => 0,
            BmiCategory::Obese => 1,
            BmiCategory::Overweight => 2,
            BmiCategory::Underweight => 3,
        }
    }
}

/// Diagnosed sleep disorder, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SleepDisorder {
    Insomnia,
    Normal,
    #[serde(rename = "Sleep Apnea")]
    SleepApnea,
}

impl SleepDisorder {
    /// Integer code used during model training
    pub fn code(self) -> i64 {
        match self {
            SleepDisorder::Insomnia => 0,
            SleepDisorder::Normal => 1,
            SleepDisorder::SleepApnea => 2,
        }
    }
}

/// Health and lifestyle inputs for one prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Gender
    #[serde(alias = "Gender")]
    pub gender: Gender,

    /// BMI category
    #[serde(alias = "BMI Category")]
    pub bmi_category: BmiCategory,

    /// Sleep disorder diagnosis
    #[serde(alias = "Sleep Disorder")]
    pub sleep_disorder: SleepDisorder,

    /// Age in years (10-100)
    #[serde(alias = "Age")]
    pub age: u32,

    /// Sleep duration in hours per night (0.0-12.0)
    #[serde(alias = "Sleep Duration")]
    pub sleep_duration: f64,

    /// Physical activity in minutes per day (0-300)
    #[serde(alias = "Physical Activity Level")]
    pub physical_activity: u32,

    /// Self-reported stress level (1-10)
    #[serde(alias = "Stress Level")]
    pub stress_level: u32,

    /// Resting heart rate in bpm (40-200)
    #[serde(alias = "Heart Rate")]
    pub heart_rate: u32,

    /// Daily step count (0-30000)
    #[serde(alias = "Daily Steps")]
    pub daily_steps: u32,

    /// Systolic blood pressure in mmHg (80-200)
    #[serde(alias = "Systolic_BP")]
    pub systolic_bp: u32,

    /// Diastolic blood pressure in mmHg (50-120)
    #[serde(alias = "Diastolic_BP")]
    pub diastolic_bp: u32,
}

impl HealthProfile {
    /// Check every numeric field against its valid range.
    ///
    /// Fails fast with the field name and allowed range. Categorical fields
    /// need no check here; out-of-enumeration strings are already rejected
    /// when the profile is parsed.
    pub fn validate(&self) -> Result<()> {
        check_range("Age", self.age as f64, 10.0, 100.0)?;
        check_range("Sleep Duration", self.sleep_duration, 0.0, 12.0)?;
        check_range(
            "Physical Activity Level",
            self.physical_activity as f64,
            0.0,
            300.0,
        )?;
        check_range("Stress Level", self.stress_level as f64, 1.0, 10.0)?;
        check_range("Heart Rate", self.heart_rate as f64, 40.0, 200.0)?;
        check_range("Daily Steps", self.daily_steps as f64, 0.0, 30000.0)?;
        check_range("Systolic_BP", self.systolic_bp as f64, 80.0, 200.0)?;
        check_range("Diastolic_BP", self.diastolic_bp as f64, 50.0, 120.0)?;
        Ok(())
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        bail!("{field} is {value}, expected a value in [{min}, {max}]");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> HealthProfile {
        HealthProfile {
            gender: Gender::Male,
            bmi_category: BmiCategory::Normal,
            sleep_disorder: SleepDisorder::Normal,
            age: 25,
            sleep_duration: 7.0,
            physical_activity: 30,
            stress_level: 5,
            heart_rate: 75,
            daily_steps: 5000,
            systolic_bp: 120,
            diastolic_bp: 80,
        }
    }

    #[test]
    fn test_categorical_codes() {
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Gender::Female.code(), 0);

        assert_eq!(BmiCategory::Normal.code(), 0);
        assert_eq!(BmiCategory::Obese.code(), 1);
        assert_eq!(BmiCategory::Overweight.code(), 2);
        assert_eq!(BmiCategory::Underweight.code(), 3);

        assert_eq!(SleepDisorder::Insomnia.code(), 0);
        assert_eq!(SleepDisorder::Normal.code(), 1);
        assert_eq!(SleepDisorder::SleepApnea.code(), 2);
    }

    #[test]
    fn test_profile_serialization() {
        let profile = sample_profile();

        let json = serde_json::to_string(&profile).unwrap();
        let deserialized: HealthProfile = serde_json::from_str(&json).unwrap();

        assert_eq!(profile.age, deserialized.age);
        assert_eq!(profile.gender, deserialized.gender);
        assert_eq!(profile.sleep_duration, deserialized.sleep_duration);
    }

    #[test]
    fn test_accepts_dataset_column_names() {
        let json = r#"{
            "Gender": "Female",
            "BMI Category": "Overweight",
            "Sleep Disorder": "Sleep Apnea",
            "Age": 42,
            "Sleep Duration": 6.5,
            "Physical Activity Level": 45,
            "Stress Level": 7,
            "Heart Rate": 82,
            "Daily Steps": 6500,
            "Systolic_BP": 130,
            "Diastolic_BP": 85
        }"#;

        let profile: HealthProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.sleep_disorder, SleepDisorder::SleepApnea);
        assert_eq!(profile.age, 42);
    }

    #[test]
    fn test_rejects_unknown_categorical_value() {
        let json = r#"{
            "Gender": "Other",
            "BMI Category": "Normal",
            "Sleep Disorder": "Normal",
            "Age": 42,
            "Sleep Duration": 6.5,
            "Physical Activity Level": 45,
            "Stress Level": 7,
            "Heart Rate": 82,
            "Daily Steps": 6500,
            "Systolic_BP": 130,
            "Diastolic_BP": 85
        }"#;

        assert!(serde_json::from_str::<HealthProfile>(json).is_err());
    }

    #[test]
    fn test_validate_accepts_boundaries() {
        let mut profile = sample_profile();
        profile.age = 10;
        profile.sleep_duration = 12.0;
        profile.stress_level = 1;
        profile.daily_steps = 30000;
        assert!(profile.validate().is_ok());

        profile.age = 100;
        profile.sleep_duration = 0.0;
        profile.stress_level = 10;
        profile.daily_steps = 0;
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut profile = sample_profile();
        profile.age = 9;
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("Age"));

        let mut profile = sample_profile();
        profile.heart_rate = 250;
        assert!(profile.validate().is_err());

        let mut profile = sample_profile();
        profile.sleep_duration = f64::NAN;
        assert!(profile.validate().is_err());
    }
}
