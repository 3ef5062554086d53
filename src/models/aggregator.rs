//! Score aggregation for the regression ensemble.
//!
//! Two policies exist for combining per-model scores into the final sleep
//! score. Both are kept behind one named interface and selected by
//! configuration instead of living in divergent copies of the pipeline.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Policy for combining per-model scores
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationPolicy {
    /// Arithmetic mean of all model outputs
    Mean,
    /// Mean, unless the guard model scores below the guard threshold, in
    /// which case the guard model's score is returned directly. A low
    /// linear-model score is treated as a conservative override signal
    /// rather than averaged away.
    #[default]
    GuardedMean,
}

/// Aggregates scores from the model ensemble into a single sleep score
pub struct ScoreAggregator {
    policy: AggregationPolicy,
    guard_model: String,
    guard_threshold: f64,
}

impl ScoreAggregator {
    /// Create a new aggregator
    pub fn new(policy: AggregationPolicy, guard_model: String, guard_threshold: f64) -> Self {
        Self {
            policy,
            guard_model,
            guard_threshold,
        }
    }

    /// Plain arithmetic-mean aggregator
    pub fn mean() -> Self {
        Self::new(AggregationPolicy::Mean, String::new(), 0.0)
    }

    /// The configured policy
    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Combine per-model scores into the final score.
    ///
    /// The score map must be non-empty and, under the guarded policy, must
    /// contain the guard model; the engine guarantees both since the
    /// ensemble roster is fixed at startup.
    pub fn aggregate(&self, model_scores: &HashMap<String, f64>) -> Result<f64> {
        if model_scores.is_empty() {
            bail!("No model scores to aggregate");
        }

        match self.policy {
            AggregationPolicy::Mean => Ok(arithmetic_mean(model_scores)),
            AggregationPolicy::GuardedMean => {
                let guard = model_scores
                    .get(&self.guard_model)
                    .copied()
                    .with_context(|| {
                        format!("Guard model {:?} missing from scores", self.guard_model)
                    })?;

                if guard < self.guard_threshold {
                    Ok(guard)
                } else {
                    Ok(arithmetic_mean(model_scores))
                }
            }
        }
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(
            AggregationPolicy::GuardedMean,
            "LinearRegression".to_string(),
            5.0,
        )
    }
}

fn arithmetic_mean(model_scores: &HashMap<String, f64>) -> f64 {
    model_scores.values().sum::<f64>() / model_scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs
            .iter()
            .map(|(name, score)| (name.to_string(), *score))
            .collect()
    }

    #[test]
    fn test_guarded_mean_override() {
        let aggregator = ScoreAggregator::default();
        let scores = scores(&[
            ("GradientBoosting", 7.0),
            ("KNN", 9.0),
            ("RandomForest", 6.0),
            ("DecisionTree", 8.0),
            ("LinearRegression", 4.0),
            ("SVR", 10.0),
        ]);

        // Guard model below 5 wins outright
        assert_eq!(aggregator.aggregate(&scores).unwrap(), 4.0);
    }

    #[test]
    fn test_plain_mean_ignores_guard() {
        let aggregator = ScoreAggregator::mean();
        let scores = scores(&[
            ("GradientBoosting", 7.0),
            ("KNN", 9.0),
            ("RandomForest", 6.0),
            ("DecisionTree", 8.0),
            ("LinearRegression", 4.0),
            ("SVR", 10.0),
        ]);

        let mean = aggregator.aggregate(&scores).unwrap();
        assert!((mean - 44.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_policies_agree_above_threshold() {
        let scores = scores(&[
            ("GradientBoosting", 7.0),
            ("KNN", 8.0),
            ("RandomForest", 9.0),
            ("DecisionTree", 10.0),
            ("LinearRegression", 6.0),
            ("SVR", 6.0),
        ]);

        let guarded = ScoreAggregator::default().aggregate(&scores).unwrap();
        let plain = ScoreAggregator::mean().aggregate(&scores).unwrap();

        assert_eq!(guarded, plain);
        assert!((guarded - 46.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_guard_at_threshold_uses_mean() {
        let scores = scores(&[("LinearRegression", 5.0), ("SVR", 9.0)]);

        let guarded = ScoreAggregator::default().aggregate(&scores).unwrap();
        assert!((guarded - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_guard_model_is_error() {
        let aggregator = ScoreAggregator::default();
        let scores = scores(&[("SVR", 9.0)]);

        let err = aggregator.aggregate(&scores).unwrap_err();
        assert!(err.to_string().contains("LinearRegression"));
    }

    #[test]
    fn test_empty_scores_is_error() {
        let aggregator = ScoreAggregator::mean();
        assert!(aggregator.aggregate(&HashMap::new()).is_err());
    }

    #[test]
    fn test_policy_accessor() {
        assert_eq!(
            ScoreAggregator::default().policy(),
            AggregationPolicy::GuardedMean
        );
        assert_eq!(ScoreAggregator::mean().policy(), AggregationPolicy::Mean);
    }

    #[test]
    fn test_policy_deserializes_kebab_case() {
        let policy: AggregationPolicy = serde_json::from_str("\"guarded-mean\"").unwrap();
        assert_eq!(policy, AggregationPolicy::GuardedMean);

        let policy: AggregationPolicy = serde_json::from_str("\"mean\"").unwrap();
        assert_eq!(policy, AggregationPolicy::Mean);
    }
}
