//! Configuration management for the price estimator

use crate::types::car::{InputBounds, BRANDS};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Serialized model format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// ONNX graph run through ONNX Runtime
    Onnx,
    /// JSON intercept and coefficients, one per schema column
    #[default]
    Linear,
    /// smartcore random forest regressor serialized as JSON
    RandomForest,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub models: ModelsConfig,
    pub form: FormConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Path to the serialized regression model
    pub model_path: String,
    /// Path to the ordered feature-column list
    pub columns_path: String,
    /// Format of the model file
    pub kind: ModelKind,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            model_path: "model/car_price_linear.json".to_string(),
            columns_path: "model/model_columns.json".to_string(),
            kind: ModelKind::Linear,
            onnx_threads: 1,
        }
    }
}

/// Interactive form configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Brands offered by the brand selector
    pub brands: Vec<String>,
    /// Accepted ranges for the numeric fields
    pub bounds: InputBounds,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            brands: BRANDS.iter().map(|b| b.to_string()).collect(),
            bounds: InputBounds::default(),
        }
    }
}

/// Output formatting
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Symbol printed in front of estimated prices
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "Rp".to_string(),
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
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path.
    ///
    /// The file is optional; missing keys fall back to defaults and
    /// `AUTOPRICE__SECTION__KEY` environment variables override both.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("AUTOPRICE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
