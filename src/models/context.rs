//! Startup-loaded model and schema, injected into the prediction path

use crate::config::ModelsConfig;
use crate::error::PredictionError;
use crate::models::inference::InferenceEngine;
use crate::models::loader::{ModelLoader, PriceModel};
use crate::models::schema::FeatureSchema;
use anyhow::{bail, Result};
use tracing::{error, info};

enum ContextState {
    Ready {
        schema: FeatureSchema,
        engine: InferenceEngine,
    },
    Unavailable {
        reason: String,
    },
}

/// Read-only artifacts loaded once per process.
///
/// A context whose artifacts failed to load stays usable: every prediction
/// through it fails with [`PredictionError::ModelUnavailable`].
pub struct PredictionContext {
    state: ContextState,
}

impl PredictionContext {
    /// Load schema and model from the configured paths.
    ///
    /// Load failures are logged once and recorded in the context.
    pub fn load(config: &ModelsConfig) -> Self {
        match Self::try_load(config) {
            Ok(context) => context,
            Err(e) => {
                let reason = format!("{:#}", e);
                error!(
                    model_path = %config.model_path,
                    columns_path = %config.columns_path,
                    error = %reason,
                    "Failed to load model or column file, predictions disabled"
                );
                Self::unavailable(reason)
            }
        }
    }

    /// Load schema and model, failing on the first error
    pub fn try_load(config: &ModelsConfig) -> Result<Self> {
        let schema = FeatureSchema::load(&config.columns_path)?;
        let model = ModelLoader::with_threads(config.onnx_threads)
            .load(config.kind, &config.model_path)?;
        Self::from_parts(schema, model)
    }

    /// Assemble a context from already-loaded parts
    pub fn from_parts(schema: FeatureSchema, model: Box<dyn PriceModel>) -> Result<Self> {
        if let Some(width) = model.input_width() {
            if width != schema.len() {
                bail!(
                    "Model expects {} features but the column list has {}",
                    width,
                    schema.len()
                );
            }
        }

        info!(
            model = model.name(),
            columns = schema.len(),
            "Prediction context ready"
        );

        let engine = InferenceEngine::new(model, schema.len());
        Ok(Self {
            state: ContextState::Ready { schema, engine },
        })
    }

    /// A context that rejects every prediction with the given reason
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ContextState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ContextState::Ready { .. })
    }

    /// Schema and engine, or the startup failure
    pub fn ready(&self) -> Result<(&FeatureSchema, &InferenceEngine), PredictionError> {
        match &self.state {
            ContextState::Ready { schema, engine } => Ok((schema, engine)),
            ContextState::Unavailable { reason } => Err(PredictionError::ModelUnavailable {
                reason: reason.clone(),
            }),
        }
    }

    pub fn schema(&self) -> Result<&FeatureSchema, PredictionError> {
        self.ready().map(|(schema, _)| schema)
    }
}
