//! NIDRA — sleep score prediction library
//!
//! Maps health and lifestyle inputs to a fixed-order feature vector, runs a
//! pre-trained regression ensemble (ONNX artifacts), and aggregates the
//! per-model scores into one sleep score with a qualitative category.

pub mod config;
pub mod features;
pub mod models;
pub mod scalers;
pub mod types;

pub use config::AppConfig;
pub use features::FeatureAssembler;
pub use models::inference::{EnsembleEngine, PredictionResult};
pub use scalers::ScalerBank;
pub use types::{HealthProfile, SleepCategory, SleepReport};
