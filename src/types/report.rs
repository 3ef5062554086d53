//! Sleep score report data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Qualitative sleep score category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepCategory {
    Good,
    #[serde(rename = "Average to Good")]
    AverageToGood,
    Bad,
}

impl SleepCategory {
    /// Map a final aggregated score to its category.
    ///
    /// Thresholds are fixed: >= 8 is Good, [6, 8) is Average to Good,
    /// below 6 is Bad. The unrounded score is used here; rounding to two
    /// decimals happens only at display time.
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            SleepCategory::Good
        } else if score >= 6.0 {
            SleepCategory::AverageToGood
        } else {
            SleepCategory::Bad
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            SleepCategory::Good => "Good",
            SleepCategory::AverageToGood => "Average to Good",
            SleepCategory::Bad => "Bad",
        }
    }

    /// Fixed advice string shown with the category
    pub fn advice(self) -> &'static str {
        match self {
            SleepCategory::Good => {
                "Your sleep score is good! Keep maintaining your healthy habits."
            }
            SleepCategory::AverageToGood => {
                "Your sleep score is average to good. With small improvements, it can become excellent."
            }
            SleepCategory::Bad => {
                "Your sleep score is low. Consider improving your sleep habits and lifestyle."
            }
        }
    }
}

/// Full prediction report for one profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepReport {
    /// Unique report identifier
    pub report_id: String,

    /// Final aggregated sleep score
    pub sleep_score: f64,

    /// Qualitative category derived from the score
    pub category: SleepCategory,

    /// Fixed advice string for the category
    pub advice: String,

    /// Individual model scores
    pub model_scores: HashMap<String, f64>,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl SleepReport {
    /// Create a new report from an aggregated score and per-model scores
    pub fn new(sleep_score: f64, category: SleepCategory, model_scores: HashMap<String, f64>) -> Self {
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            sleep_score,
            category,
            advice: category.advice().to_string(),
            model_scores,
            timestamp: Utc::now(),
        }
    }
}
