//! ONNX model loader

use anyhow::{bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// The fixed ensemble: model name and artifact filename.
///
/// Every entry must load at startup; the service does not run with a
/// partial ensemble.
pub const MODEL_FILES: [(&str, &str); 6] = [
    ("GradientBoosting", "gradient_boosting.onnx"),
    ("KNN", "knn.onnx"),
    ("RandomForest", "random_forest.onnx"),
    ("DecisionTree", "decision_tree.onnx"),
    ("LinearRegression", "linear_regression.onnx"),
    ("SVR", "svr.onnx"),
];

/// Loaded ONNX model with metadata
#[derive(Debug)]
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for the predicted score
    pub output_name: String,
}

/// Loader for ONNX regression models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        // Initialize ONNX Runtime
        ort::init().commit();
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a single ONNX model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| anyhow::anyhow!("{e}"))?
            .with_intra_threads(self.onnx_threads)
            .map_err(|e| anyhow::anyhow!("{e}"))?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        // Get input/output names
        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "float_input".to_string());

        // skl2onnx regressors name the prediction output "variable"
        let output_name = session
            .outputs()
            .iter()
            .find(|o| o.name().contains("variable") || o.name().contains("output"))
            .map(|o| o.name().to_string())
            .unwrap_or_else(|| {
                session
                    .outputs()
                    .last()
                    .map(|o| o.name().to_string())
                    .unwrap_or_else(|| "variable".to_string())
            });

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            output_name,
        })
    }

    /// Load the full ensemble from a directory.
    ///
    /// A missing or unloadable artifact is fatal: predictions from a partial
    /// ensemble would silently change the aggregate, so startup fails
    /// instead.
    pub fn load_all_models<P: AsRef<Path>>(&self, models_dir: P) -> Result<Vec<LoadedModel>> {
        let models_dir = models_dir.as_ref();
        let mut models = Vec::with_capacity(MODEL_FILES.len());

        for (name, filename) in &MODEL_FILES {
            let path = models_dir.join(filename);
            if !path.exists() {
                bail!(
                    "Model artifact {} not found at {}",
                    name,
                    path.display()
                );
            }
            let model = self
                .load_model(&path, name)
                .with_context(|| format!("Failed to load model {name}"))?;
            models.push(model);
        }

        info!(
            count = models.len(),
            "Loaded {} models from {}",
            models.len(),
            models_dir.display()
        );

        Ok(models)
    }
}
