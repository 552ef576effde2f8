//! AutoPrice car price estimation library
//!
//! Builds feature vectors aligned with a pre-trained regression model's
//! column schema from user-entered car attributes, and runs them through
//! the model to estimate a price.

pub mod catalog;
pub mod config;
pub mod error;
pub mod feature_builder;
pub mod form;
pub mod logging;
pub mod models;
pub mod types;

pub use config::AppConfig;
pub use error::PredictionError;
pub use feature_builder::{FeatureBuilder, FeatureVector};
pub use models::{FeatureSchema, PredictionContext, PricePredictor};
pub use types::{CarInput, PriceEstimate};
