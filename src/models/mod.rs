//! ML model inference components

pub mod aggregator;
pub mod inference;
pub mod loader;

pub use aggregator::{AggregationPolicy, ScoreAggregator};
pub use inference::{EnsembleEngine, PredictionResult};
pub use loader::ModelLoader;
