//! Feature vector assembly for car price model inference.
//!
//! Maps raw car attributes onto the columns the model was trained on:
//! numeric columns by name, categorical fields as one-hot columns named
//! `<prefix><lowercased value>`.

use crate::models::schema::FeatureSchema;
use crate::types::car::CarInput;
use crate::types::estimate::{CategoryField, UnrecognizedCategory};
use tracing::{debug, warn};

/// Column holding the production year
pub const YEAR_COLUMN: &str = "Year";

/// Column holding the odometer reading
pub const MILEAGE_COLUMN: &str = "KM's driven";

/// Numeric values keyed by the schema's columns, in schema order.
#[derive(Debug, Clone)]
pub struct FeatureVector<'a> {
    schema: &'a FeatureSchema,
    values: Vec<f64>,
}

impl<'a> FeatureVector<'a> {
    /// All columns initialised to zero
    pub fn zeroed(schema: &'a FeatureSchema) -> Self {
        Self {
            schema,
            values: vec![0.0; schema.len()],
        }
    }

    /// Set a column if the schema has it. Returns whether it was set.
    pub fn set(&mut self, column: &str, value: f64) -> bool {
        match self.schema.position(column) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.position(column).map(|i| self.values[i])
    }

    /// `(column, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Flattened values in schema order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of columns with the given prefix that are non-zero
    pub fn active_with_prefix(&self, prefix: &str) -> usize {
        self.iter()
            .filter(|(name, value)| name.starts_with(prefix) && *value != 0.0)
            .count()
    }
}

/// Feature vector plus the non-fatal notices raised while building it
#[derive(Debug, Clone)]
pub struct BuiltFeatures<'a> {
    pub vector: FeatureVector<'a>,
    pub unrecognized: Vec<UnrecognizedCategory>,
}

/// Builds model-aligned feature vectors from raw car attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the feature vector for one request.
    ///
    /// Never fails: categories missing from the schema are reported in
    /// `unrecognized` and leave their columns at zero.
    pub fn build<'a>(&self, schema: &'a FeatureSchema, input: &CarInput) -> BuiltFeatures<'a> {
        let mut vector = FeatureVector::zeroed(schema);

        vector.set(YEAR_COLUMN, input.year as f64);
        vector.set(MILEAGE_COLUMN, input.mileage as f64);

        let categorical = [
            (CategoryField::Brand, input.brand.as_str()),
            (CategoryField::ModelName, input.model_name.as_str()),
            (CategoryField::Fuel, input.fuel.as_str()),
            (CategoryField::Transmission, input.transmission.as_str()),
        ];

        let mut unrecognized = Vec::new();
        for (field, value) in categorical {
            let column = field.column_for(value);
            if !vector.set(&column, 1.0) {
                warn!(
                    field = field.label(),
                    value = %value,
                    column = %column,
                    "Category not found in model columns, prediction may be less accurate"
                );
                unrecognized.push(UnrecognizedCategory {
                    field,
                    value: value.to_string(),
                    column,
                });
            }
        }

        debug!(
            columns = vector.len(),
            unrecognized = unrecognized.len(),
            engine_size_cc = input.engine_size_cc,
            condition = %input.condition,
            "Feature vector built (engine size and condition not encoded)"
        );

        BuiltFeatures {
            vector,
            unrecognized,
        }
    }
}
