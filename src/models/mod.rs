//! Model artifacts and price inference

pub mod context;
pub mod inference;
pub mod loader;
pub mod schema;

pub use context::PredictionContext;
pub use inference::{InferenceEngine, PricePredictor};
pub use loader::{ForestArtifact, LinearModel, ModelLoader, PriceModel};
pub use schema::FeatureSchema;
