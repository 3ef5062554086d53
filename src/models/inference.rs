//! Ensemble inference engine for sleep score prediction

use crate::config::AppConfig;
use crate::models::aggregator::ScoreAggregator;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::report::{SleepCategory, SleepReport};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

/// Result of one full ensemble pass
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Final aggregated sleep score
    pub sleep_score: f64,
    /// Individual model scores
    pub model_scores: HashMap<String, f64>,
    /// Category derived from the final score
    pub category: SleepCategory,
}

impl PredictionResult {
    /// Wrap the prediction into a timestamped report
    pub fn to_report(&self) -> SleepReport {
        SleepReport::new(self.sleep_score, self.category, self.model_scores.clone())
    }
}

/// Multi-model inference engine using ONNX Runtime.
///
/// Models are loaded once at startup and held immutable for the process
/// lifetime; the `RwLock` exists only because `ort` sessions need `&mut`
/// to run.
pub struct EnsembleEngine {
    models: Vec<RwLock<LoadedModel>>,
    aggregator: ScoreAggregator,
}

impl EnsembleEngine {
    /// Create a new engine from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.artifacts.onnx_threads)?;
        let models: Vec<RwLock<LoadedModel>> = loader
            .load_all_models(&config.artifacts.models_dir)?
            .into_iter()
            .map(RwLock::new)
            .collect();

        let aggregator = ScoreAggregator::new(
            config.aggregation.policy,
            config.aggregation.guard_model.clone(),
            config.aggregation.guard_threshold,
        );

        info!(
            models = models.len(),
            policy = ?aggregator.policy(),
            "Ensemble engine initialized"
        );

        Ok(Self { models, aggregator })
    }

    /// Get the number of loaded models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Get loaded model names
    pub fn model_names(&self) -> Vec<String> {
        self.models
            .iter()
            .filter_map(|m| m.read().ok().map(|m| m.name.clone()))
            .collect()
    }

    /// Run the full ensemble on one feature vector.
    ///
    /// Every model is invoked on the same vector; invocation order does not
    /// affect the result. There are no retries and no fallback scores: the
    /// first model failure aborts the whole request.
    pub fn predict(&self, features: &[f32]) -> Result<PredictionResult> {
        let mut model_scores = HashMap::with_capacity(self.models.len());

        for model_lock in &self.models {
            let mut model = model_lock
                .write()
                .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
            let model_name = model.name.clone();

            let score = self
                .run_single_model(&mut model, features)
                .with_context(|| format!("Inference failed for model {model_name}"))?;

            debug!(model = %model_name, score = score, "Model scored");
            model_scores.insert(model_name, score);
        }

        let sleep_score = self.aggregator.aggregate(&model_scores)?;
        let category = SleepCategory::from_score(sleep_score);

        debug!(
            sleep_score = sleep_score,
            category = category.label(),
            model_scores = ?model_scores,
            "Ensemble inference complete"
        );

        Ok(PredictionResult {
            sleep_score,
            model_scores,
            category,
        })
    }

    /// Run a single model on features
    fn run_single_model(&self, model: &mut LoadedModel, features: &[f32]) -> Result<f64> {
        use ort::value::Tensor;

        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let model_name = model.name.clone();

        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input_tensor])?;

        extract_score(&outputs, &model.output_name, &model_name)
    }
}

/// Extract the predicted scalar from a regressor's output.
///
/// skl2onnx regressors emit a single float tensor, shape `[1, 1]` or `[1]`.
fn extract_score(
    outputs: &ort::session::SessionOutputs,
    output_name: &str,
    model_name: &str,
) -> Result<f64> {
    if let Some(output) = outputs.get(output_name) {
        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            return first_value(data, model_name);
        }
    }

    // Fallback: take the first float tensor among all outputs
    for (name, output) in outputs.iter() {
        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            debug!(model = %model_name, output = %name, "Extracted score from fallback output");
            return first_value(data, model_name);
        }
    }

    anyhow::bail!("Model {model_name} produced no float tensor output")
}

fn first_value(data: &[f32], model_name: &str) -> Result<f64> {
    data.first()
        .map(|&v| v as f64)
        .with_context(|| format!("Model {model_name} produced an empty output tensor"))
}
