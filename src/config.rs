//! Configuration management for the sleep score service

use crate::models::aggregator::AggregationPolicy;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub preprocessing: PreprocessingConfig,
    pub aggregation: AggregationConfig,
    pub logging: LoggingConfig,
}

/// Locations and settings for the trained artifacts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory containing the ONNX model files
    pub models_dir: String,
    /// Path to the scaler JSON artifact
    pub scaler_path: String,
    /// Number of threads for ONNX inference per model
    pub onnx_threads: usize,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            models_dir: "models".to_string(),
            scaler_path: "models/scalers.json".to_string(),
            onnx_threads: 1,
        }
    }
}

/// Preprocessing switches applied before scaling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Feed `12 - duration` to the sleep-duration scaler instead of the raw
    /// value. The shipped artifacts were trained on the inverted value, so
    /// this defaults to on; turning it off is only correct for artifacts
    /// trained on raw hours.
    pub invert_sleep_duration: bool,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            invert_sleep_duration: true,
        }
    }
}

/// Ensemble aggregation policy configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// "mean" or "guarded-mean"
    pub policy: AggregationPolicy,
    /// Model whose low score overrides the mean under "guarded-mean"
    pub guard_model: String,
    /// Guard model scores below this value are returned directly
    pub guard_threshold: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            policy: AggregationPolicy::GuardedMean,
            guard_model: "LinearRegression".to_string(),
            guard_threshold: 5.0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields the built-in defaults; a present but malformed
    /// file is an error.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
