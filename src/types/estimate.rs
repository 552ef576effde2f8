//! Price estimate data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical input fields that map onto one-hot model columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Brand,
    ModelName,
    Fuel,
    Transmission,
}

impl CategoryField {
    /// Column name prefix used when the model was trained
    pub fn column_prefix(self) -> &'static str {
        match self {
            CategoryField::Brand => "make_",
            CategoryField::ModelName => "model_",
            CategoryField::Fuel => "fuel_",
            CategoryField::Transmission => "transmission_",
        }
    }

    /// Candidate one-hot column for a raw value
    pub fn column_for(self, value: &str) -> String {
        format!("{}{}", self.column_prefix(), value.trim().to_lowercase())
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryField::Brand => "brand",
            CategoryField::ModelName => "model",
            CategoryField::Fuel => "fuel type",
            CategoryField::Transmission => "transmission",
        }
    }
}

/// A categorical value with no matching model column.
///
/// Non-fatal: the field is left at zero and the estimate may be less accurate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnrecognizedCategory {
    pub field: CategoryField,
    pub value: String,
    /// Column name that was looked up
    pub column: String,
}

impl fmt::Display for UnrecognizedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' not found in the model columns (looked for '{}'); the estimate may be less accurate",
            self.field.label(),
            self.value,
            self.column
        )
    }
}

/// Successful price estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEstimate {
    /// Unique estimate identifier
    pub estimate_id: String,

    /// Model output, verbatim
    pub price: f64,

    /// Categories the model did not recognise
    pub unrecognized: Vec<UnrecognizedCategory>,

    /// Estimate generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl PriceEstimate {
    pub fn new(price: f64) -> Self {
        Self {
            estimate_id: uuid::Uuid::new_v4().to_string(),
            price,
            unrecognized: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach category notices raised while building the features
    pub fn with_unrecognized(mut self, unrecognized: Vec<UnrecognizedCategory>) -> Self {
        self.unrecognized = unrecognized;
        self
    }

    /// Price rendered with the given currency symbol
    pub fn formatted(&self, currency_symbol: &str) -> String {
        format_currency(self.price, currency_symbol)
    }
}

/// Format an amount as whole currency units with `,` thousands separators.
///
/// `format_currency(245_000_000.4, "Rp")` gives `"Rp 245,000,000"`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("{} -{}", symbol, grouped)
    } else {
        format!("{} {}", symbol, grouped)
    }
}
