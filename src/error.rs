//! Error types surfaced by the prediction path

use thiserror::Error;

/// Failures of a single price estimation request
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    /// Model or schema artifacts were missing or failed to load at startup
    #[error("Model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// Required fields missing or values out of range
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Flattened feature vector does not line up with the model schema
    #[error("Feature vector has {actual} values but the model expects {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// The model itself failed or produced an unusable value
    #[error("Prediction failed: {reason}")]
    Inference { reason: String },
}

impl PredictionError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
