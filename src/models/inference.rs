//! Price inference: the model invoker and the end-to-end estimator

use crate::error::PredictionError;
use crate::feature_builder::{FeatureBuilder, FeatureVector};
use crate::models::context::PredictionContext;
use crate::models::loader::PriceModel;
use crate::types::car::{CarInput, InputBounds};
use crate::types::estimate::PriceEstimate;
use tracing::{debug, error, info};

/// Runs feature vectors through the loaded regression model
pub struct InferenceEngine {
    model: Box<dyn PriceModel>,
    /// Schema length the vectors must match
    expected_features: usize,
}

impl InferenceEngine {
    pub fn new(model: Box<dyn PriceModel>, expected_features: usize) -> Self {
        Self {
            model,
            expected_features,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn expected_features(&self) -> usize {
        self.expected_features
    }

    /// Predict a price for one feature vector.
    ///
    /// Model errors and non-finite outputs become
    /// [`PredictionError::Inference`]; nothing is retried.
    pub fn predict(&self, vector: &FeatureVector<'_>) -> Result<f64, PredictionError> {
        if vector.len() != self.expected_features {
            return Err(PredictionError::SchemaMismatch {
                expected: self.expected_features,
                actual: vector.len(),
            });
        }

        let price = self.model.predict(vector.as_slice()).map_err(|e| {
            error!(model = self.model.name(), error = %e, "Model inference failed");
            PredictionError::Inference {
                reason: format!("{:#}", e),
            }
        })?;

        if !price.is_finite() {
            error!(model = self.model.name(), price, "Model returned a non-finite value");
            return Err(PredictionError::Inference {
                reason: format!("model returned {}", price),
            });
        }

        debug!(model = self.model.name(), price, "Inference complete");
        Ok(price)
    }
}

/// Validates input, builds features and invokes the model
pub struct PricePredictor {
    context: PredictionContext,
    builder: FeatureBuilder,
    bounds: InputBounds,
}

impl PricePredictor {
    pub fn new(context: PredictionContext, bounds: InputBounds) -> Self {
        Self {
            context,
            builder: FeatureBuilder::new(),
            bounds,
        }
    }

    pub fn context(&self) -> &PredictionContext {
        &self.context
    }

    /// Estimate the price of one car.
    ///
    /// Input is validated before the context is consulted, so missing
    /// fields are reported even when the model is unavailable.
    pub fn estimate(&self, input: &CarInput) -> Result<PriceEstimate, PredictionError> {
        input.validate(&self.bounds)?;

        let (schema, engine) = self.context.ready()?;
        let built = self.builder.build(schema, input);
        let price = engine.predict(&built.vector)?;

        info!(
            brand = %input.brand,
            model_name = %input.model_name,
            year = input.year,
            price,
            unrecognized = built.unrecognized.len(),
            "Price estimated"
        );

        Ok(PriceEstimate::new(price).with_unrecognized(built.unrecognized))
    }

    /// Estimate several cars independently
    pub fn estimate_batch(&self, inputs: &[CarInput]) -> Vec<Result<PriceEstimate, PredictionError>> {
        inputs.iter().map(|input| self.estimate(input)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loader::LinearModel;
    use crate::models::schema::FeatureSchema;
    use anyhow::anyhow;

    struct FixedModel(f64);

    impl PriceModel for FixedModel {
        fn predict(&self, _features: &[f64]) -> anyhow::Result<f64> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingModel;

    impl PriceModel for FailingModel {
        fn predict(&self, _features: &[f64]) -> anyhow::Result<f64> {
            Err(anyhow!("backend exploded"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn predictor(model: Box<dyn PriceModel>) -> PricePredictor {
        let schema = FeatureSchema::from_columns(["Year", "KM's driven", "make_toyota"]).unwrap();
        let context = PredictionContext::from_parts(schema, model).unwrap();
        PricePredictor::new(context, InputBounds::default())
    }

    #[test]
    fn test_ready_engine_reports_model() {
        let predictor = predictor(Box::new(LinearModel::new(0.0, vec![1.0, 0.0, 0.0])));
        let (schema, engine) = predictor.context().ready().unwrap();

        assert_eq!(engine.model_name(), "linear");
        assert_eq!(engine.expected_features(), schema.len());
    }

    #[test]
    fn test_estimate_returns_model_output_verbatim() {
        let predictor = predictor(Box::new(FixedModel(123_456.789)));
        let estimate = predictor
            .estimate(&CarInput::new("Toyota", "Avanza", 2018, 50_000))
            .unwrap();

        assert_eq!(estimate.price, 123_456.789);
        // model, fuel and transmission columns absent from this schema
        assert_eq!(estimate.unrecognized.len(), 3);
    }

    #[test]
    fn test_estimate_uses_built_vector() {
        let predictor = predictor(Box::new(LinearModel::new(1.0, vec![10.0, 0.001, 1000.0])));
        let estimate = predictor
            .estimate(&CarInput::new("Toyota", "Avanza", 2018, 50_000))
            .unwrap();

        // 1 + 2018 * 10 + 50000 * 0.001 + 1000
        assert!((estimate.price - 21_231.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_model_name_is_invalid_before_lookup() {
        let predictor = PricePredictor::new(
            PredictionContext::unavailable("columns missing"),
            InputBounds::default(),
        );

        let err = predictor
            .estimate(&CarInput::new("Toyota", "", 2018, 50_000))
            .unwrap_err();
        assert!(matches!(err, PredictionError::InvalidInput { .. }));

        let err = predictor
            .estimate(&CarInput::new("Toyota", "Avanza", 2018, 50_000))
            .unwrap_err();
        assert_eq!(
            err,
            PredictionError::ModelUnavailable {
                reason: "columns missing".to_string()
            }
        );
    }

    #[test]
    fn test_model_failure_is_generic_inference_error() {
        let predictor = predictor(Box::new(FailingModel));
        let err = predictor
            .estimate(&CarInput::new("Toyota", "Avanza", 2018, 50_000))
            .unwrap_err();

        match err {
            PredictionError::Inference { reason } => assert!(reason.contains("backend exploded")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_output_rejected() {
        let predictor = predictor(Box::new(FixedModel(f64::NAN)));
        let err = predictor
            .estimate(&CarInput::new("Toyota", "Avanza", 2018, 50_000))
            .unwrap_err();
        assert!(matches!(err, PredictionError::Inference { .. }));
    }

    #[test]
    fn test_schema_mismatch() {
        let schema = FeatureSchema::from_columns(["Year", "make_toyota"]).unwrap();
        let engine = InferenceEngine::new(Box::new(FixedModel(1.0)), 3);

        let vector = FeatureVector::zeroed(&schema);
        assert_eq!(
            engine.predict(&vector),
            Err(PredictionError::SchemaMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_estimate_batch_is_independent() {
        let predictor = predictor(Box::new(FixedModel(5.0)));
        let results = predictor.estimate_batch(&[
            CarInput::new("Toyota", "Avanza", 2018, 50_000),
            CarInput::new("", "Avanza", 2018, 50_000),
            CarInput::new("Honda", "Civic", 2020, 1_000),
        ]);

        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
