//! Regression model loading

use crate::config::ModelKind;
use anyhow::{anyhow, bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Any regression model that maps a schema-ordered feature vector to a price.
pub trait PriceModel: Send + Sync {
    /// Predict a price for one feature vector
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Model name/type for logging
    fn name(&self) -> &str;

    /// Number of features the model expects, when the artifact records it
    fn input_width(&self) -> Option<usize> {
        None
    }
}

/// Linear regression stored as JSON: `{"intercept": .., "coefficients": [..]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    /// One coefficient per schema column, in schema order
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}

impl PriceModel for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            bail!(
                "Expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            );
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();

        Ok(self.intercept + dot)
    }

    fn name(&self) -> &str {
        "linear"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}

/// Serialized random forest: `{"n_features": N, "forest": {..}}`.
///
/// smartcore does not record the training width, so the artifact carries it.
#[derive(Serialize, Deserialize)]
pub struct ForestArtifact {
    /// Number of columns the forest was fitted on
    pub n_features: usize,
    pub forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

/// smartcore random forest regressor deserialized from JSON
pub struct ForestModel {
    n_features: usize,
    model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl PriceModel for ForestModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            bail!(
                "Expected {} features, got {}",
                self.n_features,
                features.len()
            );
        }

        let input = DenseMatrix::from_2d_vec(&vec![features.to_vec()])
            .map_err(|e| anyhow!("Matrix creation failed: {}", e))?;

        let predictions = self
            .model
            .predict(&input)
            .map_err(|e| anyhow!("Random forest prediction failed: {}", e))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| anyhow!("No prediction returned"))
    }

    fn name(&self) -> &str {
        "random_forest"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.n_features)
    }
}

/// ONNX regression graph with a single `[1, n]` float input
pub struct OnnxModel {
    /// ONNX Runtime session (running needs exclusive access)
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
    /// Output name holding the predicted value
    output_name: String,
}

impl PriceModel for OnnxModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        let input: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let shape = vec![1_i64, input.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, input)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| anyhow!("Model produced no '{}' output", self.output_name))?;

        let (_, data) = output.try_extract_tensor::<f32>()?;
        let price = data
            .first()
            .map(|&v| v as f64)
            .ok_or_else(|| anyhow!("Empty output tensor"))?;

        Ok(price)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Loader for serialized regression models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of ONNX threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load a model of the given kind from file
    pub fn load<P: AsRef<Path>>(&self, kind: ModelKind, path: P) -> Result<Box<dyn PriceModel>> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("Model file not found: {}", path.display());
        }

        info!(kind = ?kind, path = %path.display(), "Loading price model");

        let model: Box<dyn PriceModel> = match kind {
            ModelKind::Onnx => Box::new(self.load_onnx(path)?),
            ModelKind::Linear => Box::new(self.load_linear(path)?),
            ModelKind::RandomForest => Box::new(self.load_random_forest(path)?),
        };

        info!(model = model.name(), "Model loaded successfully");
        Ok(model)
    }

    /// Load a linear model from JSON
    pub fn load_linear(&self, path: &Path) -> Result<LinearModel> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file {}", path.display()))?;
        let model: LinearModel = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to deserialize linear model {}", path.display()))?;

        if model.coefficients.is_empty() {
            bail!("Linear model {} has no coefficients", path.display());
        }
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            bail!("Linear model {} contains non-finite weights", path.display());
        }

        debug!(coefficients = model.coefficients.len(), "Linear model parsed");
        Ok(model)
    }

    /// Load a smartcore random forest from JSON
    pub fn load_random_forest(&self, path: &Path) -> Result<ForestModel> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file {}", path.display()))?;
        let artifact: ForestArtifact = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to deserialize random forest {}", path.display()))?;

        if artifact.n_features == 0 {
            bail!("Random forest {} declares no features", path.display());
        }

        debug!(n_features = artifact.n_features, "Random forest parsed");
        Ok(ForestModel {
            n_features: artifact.n_features,
            model: artifact.forest,
        })
    }

    /// Load an ONNX model into a runtime session
    pub fn load_onnx(&self, path: &Path) -> Result<OnnxModel> {
        let created = ort::init()
            .with_name("autoprice")
            .commit()
            .context("Failed to initialise ONNX Runtime")?;
        debug!(created, "ONNX Runtime environment ready");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        info!(
            input = %input_name,
            output = %output_name,
            threads = self.onnx_threads,
            "ONNX session ready"
        );

        Ok(OnnxModel {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;
    use std::io::Write;

    /// Small forest fitted on `n_features`-column rows, target = row sum
    fn fitted_forest(n_features: usize) -> ForestArtifact {
        let x: Vec<Vec<f64>> = (0..24)
            .map(|i| (0..n_features).map(|j| ((i * (j + 1)) % 7) as f64).collect())
            .collect();
        let y: Vec<f64> = x.iter().map(|row| row.iter().sum()).collect();

        let params = RandomForestRegressorParameters::default().with_n_trees(3);
        let forest =
            RandomForestRegressor::fit(&DenseMatrix::from_2d_vec(&x).unwrap(), &y, params).unwrap();

        ForestArtifact { n_features, forest }
    }

    #[test]
    fn test_linear_predict() {
        let model = LinearModel::new(100.0, vec![2.0, -1.0, 10.0]);

        assert_eq!(model.predict(&[5.0, 3.0, 1.0]).unwrap(), 117.0);
        assert_eq!(model.input_width(), Some(3));
        assert!(model.predict(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_load_linear_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"intercept": 1.5, "coefficients": [1.0, 2.0]}}"#).unwrap();

        let model = ModelLoader::new()
            .load(ModelKind::Linear, file.path())
            .unwrap();

        assert_eq!(model.name(), "linear");
        assert_eq!(model.input_width(), Some(2));
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 4.5);
    }

    #[test]
    fn test_load_rejects_bad_artifacts() {
        let loader = ModelLoader::new();

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, r#"{{"intercept": 0.0, "coefficients": []}}"#).unwrap();
        assert!(loader.load(ModelKind::Linear, empty.path()).is_err());

        let mut garbage = tempfile::NamedTempFile::new().unwrap();
        write!(garbage, "not a model").unwrap();
        assert!(loader.load(ModelKind::Linear, garbage.path()).is_err());
        assert!(loader.load(ModelKind::RandomForest, garbage.path()).is_err());
        // runtime initialises, then the session builder rejects the bytes
        assert!(loader.load(ModelKind::Onnx, garbage.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelLoader::new()
            .load(ModelKind::Onnx, dir.path().join("car_price.onnx"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_random_forest_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &fitted_forest(5)).unwrap();

        let model = ModelLoader::new()
            .load(ModelKind::RandomForest, file.path())
            .unwrap();

        assert_eq!(model.name(), "random_forest");
        assert_eq!(model.input_width(), Some(5));

        let price = model.predict(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(price.is_finite());
        assert!(model.predict(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_forest_without_width_is_rejected() {
        let artifact = fitted_forest(4);

        // bare smartcore JSON, no width recorded
        let mut bare = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut bare, &artifact.forest).unwrap();
        assert!(ModelLoader::new()
            .load(ModelKind::RandomForest, bare.path())
            .is_err());

        let mut zero = tempfile::NamedTempFile::new().unwrap();
        let artifact = ForestArtifact {
            n_features: 0,
            forest: artifact.forest,
        };
        serde_json::to_writer(&mut zero, &artifact).unwrap();
        assert!(ModelLoader::new()
            .load(ModelKind::RandomForest, zero.path())
            .is_err());
    }
}
