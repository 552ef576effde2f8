//! Car attributes collected for a price estimate

use crate::error::PredictionError;
use serde::{Deserialize, Serialize};

/// Brands offered by the form selector
pub const BRANDS: &[&str] = &[
    "Toyota",
    "Honda",
    "Suzuki",
    "Daihatsu",
    "Mitsubishi",
    "Nissan",
    "BMW",
    "Mercedes",
];

pub const TRANSMISSIONS: &[&str] = &["Automatic", "Manual"];

pub const FUEL_TYPES: &[&str] = &["Petrol", "Diesel", "Hybrid", "Electric"];

pub const CONDITIONS: &[&str] = &["Excellent", "Good", "Fair", "Poor"];

/// Raw, per-request car attributes.
///
/// Categorical fields stay free-form strings; the feature builder decides
/// whether the model knows them. `engine_size_cc` and `condition` are
/// collected from the user but are not encoded into the feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarInput {
    /// Manufacturer, e.g. "Toyota"
    #[serde(alias = "make")]
    pub brand: String,

    /// Model name, e.g. "Avanza"
    #[serde(alias = "model")]
    pub model_name: String,

    /// Production year
    pub year: i32,

    /// Odometer reading in kilometres
    #[serde(alias = "km_driven")]
    pub mileage: u32,

    /// "Automatic" or "Manual"
    #[serde(default = "default_transmission")]
    pub transmission: String,

    /// "Petrol", "Diesel", "Hybrid" or "Electric"
    #[serde(default = "default_fuel")]
    pub fuel: String,

    /// Engine displacement in cc (not used by the model)
    #[serde(alias = "engine_cc", default = "default_engine_size")]
    pub engine_size_cc: u32,

    /// Overall condition (not used by the model)
    #[serde(default = "default_condition")]
    pub condition: String,
}

fn default_transmission() -> String {
    TRANSMISSIONS[0].to_string()
}

fn default_fuel() -> String {
    FUEL_TYPES[0].to_string()
}

fn default_engine_size() -> u32 {
    1500
}

fn default_condition() -> String {
    CONDITIONS[0].to_string()
}

impl Default for CarInput {
    fn default() -> Self {
        Self {
            brand: String::new(),
            model_name: String::new(),
            year: 2015,
            mileage: 50_000,
            transmission: default_transmission(),
            fuel: default_fuel(),
            engine_size_cc: default_engine_size(),
            condition: default_condition(),
        }
    }
}

impl CarInput {
    /// Create an input with the required fields; the rest take form defaults
    pub fn new(brand: impl Into<String>, model_name: impl Into<String>, year: i32, mileage: u32) -> Self {
        Self {
            brand: brand.into(),
            model_name: model_name.into(),
            year,
            mileage,
            ..Self::default()
        }
    }

    pub fn with_transmission(mut self, transmission: impl Into<String>) -> Self {
        self.transmission = transmission.into();
        self
    }

    pub fn with_fuel(mut self, fuel: impl Into<String>) -> Self {
        self.fuel = fuel.into();
        self
    }

    /// Check required fields and numeric ranges.
    ///
    /// Runs before any schema lookup or model call.
    pub fn validate(&self, bounds: &InputBounds) -> Result<(), PredictionError> {
        if self.brand.trim().is_empty() {
            return Err(PredictionError::invalid_input("brand is required"));
        }
        if self.model_name.trim().is_empty() {
            return Err(PredictionError::invalid_input("model name is required"));
        }
        if !(bounds.year_min..=bounds.year_max).contains(&self.year) {
            return Err(PredictionError::invalid_input(format!(
                "year {} outside {}..={}",
                self.year, bounds.year_min, bounds.year_max
            )));
        }
        if !(bounds.mileage_min..=bounds.mileage_max).contains(&self.mileage) {
            return Err(PredictionError::invalid_input(format!(
                "mileage {} outside {}..={}",
                self.mileage, bounds.mileage_min, bounds.mileage_max
            )));
        }
        if !(bounds.engine_size_min..=bounds.engine_size_max).contains(&self.engine_size_cc) {
            return Err(PredictionError::invalid_input(format!(
                "engine size {} cc outside {}..={}",
                self.engine_size_cc, bounds.engine_size_min, bounds.engine_size_max
            )));
        }
        Ok(())
    }
}

/// Accepted ranges for the numeric form fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBounds {
    pub year_min: i32,
    pub year_max: i32,
    pub mileage_min: u32,
    pub mileage_max: u32,
    pub engine_size_min: u32,
    pub engine_size_max: u32,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            year_min: 1990,
            year_max: 2023,
            mileage_min: 0,
            mileage_max: 500_000,
            engine_size_min: 500,
            engine_size_max: 8000,
        }
    }
}
